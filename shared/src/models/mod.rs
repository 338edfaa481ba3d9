//! Data models
//!
//! Request payloads and status enums shared between the server and clients.
//! Stored entities live in `foh-server` next to their repositories.

pub mod category;
pub mod dining_table;
pub mod menu_item;
pub mod staff;

// Re-exports
pub use category::*;
pub use dining_table::*;
pub use menu_item::*;
pub use staff::*;
