//! Dining Table Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::TableStatus;
use surrealdb::RecordId;

pub const DEFAULT_CAPACITY: i32 = 4;

/// Dining table document (桌台)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub number: i32,
    #[serde(default = "default_capacity")]
    pub capacity: i32,
    #[serde(default)]
    pub status: TableStatus,
    /// Set while occupied (Unix millis)
    #[serde(default)]
    pub occupied_since: Option<i64>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

fn default_capacity() -> i32 {
    DEFAULT_CAPACITY
}

impl DiningTable {
    /// Apply a status, keeping `occupied_since` in step
    pub fn set_status(&mut self, status: TableStatus, now: i64) {
        if status == TableStatus::Occupied {
            if self.status != TableStatus::Occupied {
                self.occupied_since = Some(now);
            }
        } else {
            self.occupied_since = None;
        }
        self.status = status;
        self.updated_at = now;
    }
}
