//! Orders
//!
//! ```text
//! handler ──▶ OrderService ──▶ TableLocks::lock(table_number)
//!                  │
//!                  ├─ rules::*          (pure: lifecycle, items, attribution)
//!                  ├─ OrderRepository   (order document)
//!                  └─ DiningTableRepository (occupancy)
//! ```

pub mod error;
pub mod locks;
pub mod rules;
pub mod service;

pub use error::OrderError;
pub use locks::TableLocks;
pub use service::{OrderOutcome, OrderService};
