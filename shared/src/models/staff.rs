//! Staff Model

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Staff role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Admin,
    Waiter,
    Chef,
    Cashier,
}

impl StaffRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            StaffRole::Admin => "admin",
            StaffRole::Waiter => "waiter",
            StaffRole::Chef => "chef",
            StaffRole::Cashier => "cashier",
        }
    }

    pub const fn is_admin(self) -> bool {
        matches!(self, StaffRole::Admin)
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaffRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(StaffRole::Admin),
            "waiter" => Ok(StaffRole::Waiter),
            "chef" => Ok(StaffRole::Chef),
            "cashier" => Ok(StaffRole::Cashier),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Approval status of a staff account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StaffStatus {
    #[default]
    Pending,
    Active,
    Rejected,
}

impl StaffStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            StaffStatus::Pending => "pending",
            StaffStatus::Active => "active",
            StaffStatus::Rejected => "rejected",
        }
    }
}

/// Update staff payload (admin)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffUpdate {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<StaffRole>,
    /// New password (re-hashed)
    pub password: Option<String>,
}

/// Staff list filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffQuery {
    pub role: Option<StaffRole>,
    pub status: Option<StaffStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [
            StaffRole::Admin,
            StaffRole::Waiter,
            StaffRole::Chef,
            StaffRole::Cashier,
        ] {
            assert_eq!(role.as_str().parse::<StaffRole>(), Ok(role));
            assert_eq!(
                serde_json::to_string(&role).unwrap(),
                format!("\"{}\"", role.as_str())
            );
        }
        assert!("manager".parse::<StaffRole>().is_err());
    }

    #[test]
    fn test_status_default_is_pending() {
        assert_eq!(StaffStatus::default(), StaffStatus::Pending);
        let q: StaffQuery = serde_json::from_str(r#"{"status":"rejected"}"#).unwrap();
        assert_eq!(q.status, Some(StaffStatus::Rejected));
        assert!(q.role.is_none());
    }
}
