//! Order line items and request payloads

use serde::{Deserialize, Serialize};

use super::lifecycle::OrderStatus;

/// Line item as stored on the order (menu name and price are snapshotted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Menu item reference ("menu_item:xxx")
    pub menu_item_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Line item as submitted by a client; the server looks up name and price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub menu_item_id: String,
    pub quantity: i32,
    #[serde(default)]
    pub note: Option<String>,
}

/// One entry in the order status history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    /// `None` for the initial placement
    #[serde(default)]
    pub from: Option<OrderStatus>,
    pub to: OrderStatus,
    /// Staff id of the actor
    pub by: String,
    /// Unix millis
    pub at: i64,
}

/// Place a new order on a table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub table_number: i32,
    pub customer_name: String,
    pub items: Vec<OrderItemInput>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Replace the full item list of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceItemsRequest {
    pub items: Vec<OrderItemInput>,
    #[serde(default)]
    pub expected_version: Option<u64>,
}

/// Move an order to another status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub status: OrderStatus,
    #[serde(default)]
    pub expected_version: Option<u64>,
    /// Required when cancelling
    #[serde(default)]
    pub reason: Option<String>,
}
