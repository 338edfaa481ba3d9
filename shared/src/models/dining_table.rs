//! Dining Table Model

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Table occupancy status (桌台状态)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    Reserved,
    Maintenance,
}

/// Table status change refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableRuleError {
    #[error("table has active orders and cannot become {0}")]
    HasActiveOrders(TableStatus),
    #[error("table cannot go from {from} to {to}")]
    NotAllowed { from: TableStatus, to: TableStatus },
}

impl TableStatus {
    /// Check a status change against the occupancy rules.
    ///
    /// | Target      | Rule                                        |
    /// |-------------|---------------------------------------------|
    /// | same        | no-op                                       |
    /// | occupied    | only from available / reserved              |
    /// | available   | not while the table has active orders       |
    /// | reserved    | only from available                         |
    /// | maintenance | not while the table has active orders       |
    pub fn check_change(
        from: TableStatus,
        to: TableStatus,
        has_active_orders: bool,
    ) -> Result<(), TableRuleError> {
        use TableStatus::*;

        if from == to {
            return Ok(());
        }
        match to {
            Occupied if !matches!(from, Available | Reserved) => {
                Err(TableRuleError::NotAllowed { from, to })
            }
            Reserved if from != Available => Err(TableRuleError::NotAllowed { from, to }),
            Available | Maintenance if has_active_orders => {
                Err(TableRuleError::HasActiveOrders(to))
            }
            _ => Ok(()),
        }
    }

    /// New orders may be placed on the table
    pub const fn accepts_orders(self) -> bool {
        !matches!(self, TableStatus::Maintenance)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Occupied => "occupied",
            TableStatus::Reserved => "reserved",
            TableStatus::Maintenance => "maintenance",
        }
    }
}

impl std::fmt::Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub number: i32,
    pub capacity: Option<i32>,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    pub number: Option<i32>,
    pub capacity: Option<i32>,
}

/// Change table status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableStatusUpdate {
    pub status: TableStatus,
}
