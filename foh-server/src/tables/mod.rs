//! Dining tables
//!
//! CRUD plus status changes checked against the table's live orders.

pub mod service;

pub use service::TableService;
