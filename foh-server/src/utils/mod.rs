//! 工具模块 - 通用工具函数和类型
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - 日志、输入校验、日期工具

pub mod error;
pub mod logger;
pub mod time;
pub mod validation;

pub use error::ok;
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
