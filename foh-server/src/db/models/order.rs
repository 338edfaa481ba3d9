//! Order Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::order::{OrderItem, OrderStatus, StatusChange};
use surrealdb::RecordId;

/// Order document (订单)
///
/// `version` starts at 1 and is bumped on every write; clients send it back
/// as `expected_version` for optimistic concurrency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub table_number: i32,
    pub customer_name: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub notes: Option<String>,

    // 操作人 (staff id)
    pub placed_by: String,
    #[serde(default)]
    pub confirmed_by: Option<String>,
    #[serde(default)]
    pub billed_by: Option<String>,
    #[serde(default)]
    pub completed_by: Option<String>,
    #[serde(default)]
    pub cancelled_by: Option<String>,
    #[serde(default)]
    pub cancel_reason: Option<String>,

    #[serde(default)]
    pub history: Vec<StatusChange>,
    pub version: u64,
    pub created_at: i64,
    pub updated_at: i64,
    /// Set when the order reaches a terminal status
    #[serde(default)]
    pub closed_at: Option<i64>,
}

/// Order list filter
///
/// Query string form: `?status=pending,ready&table=4&from=2024-05-01&to=2024-05-31&active_only=true`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilter {
    /// Comma separated statuses
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub table: Option<i32>,
    /// YYYY-MM-DD (UTC), inclusive
    #[serde(default)]
    pub from: Option<String>,
    /// YYYY-MM-DD (UTC), inclusive
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub active_only: bool,
    #[serde(default)]
    pub limit: Option<u32>,
}
