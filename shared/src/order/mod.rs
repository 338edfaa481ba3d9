//! Order domain
//!
//! - `lifecycle`: the status state machine
//! - `money`: totals and line validation
//! - `types`: line items and request payloads

pub mod lifecycle;
pub mod money;
pub mod types;

pub use lifecycle::{OrderStatus, ParseOrderStatusError, TransitionError};
pub use money::{MoneyError, compute_total, line_total};
pub use types::*;
