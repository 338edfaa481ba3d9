//! Shared types for the front-of-house service
//!
//! Domain types used by the server and its clients: order lifecycle and
//! money rules, table status rules, request payloads, error codes and
//! sync message payloads. No I/O lives here.

pub mod client;
pub mod error;
pub mod message;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use message::{BusMessage, EventType};
