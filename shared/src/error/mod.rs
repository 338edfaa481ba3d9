//! Unified error system
//!
//! - [`ErrorCode`]: numeric codes shared with every client
//! - [`ErrorCategory`]: classification by code range
//! - [`AppError`]: error carried through handlers and services
//! - [`ApiResponse`]: JSON envelope used for error bodies
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::InvalidStatusTransition)
//!     .with_detail("from", "pending")
//!     .with_detail("to", "served");
//!
//! let body = ApiResponse::<()>::error(&err);
//! assert_eq!(body.code, Some(4010));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
