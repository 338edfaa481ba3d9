//! 统一错误处理
//!
//! 错误类型统一来自 `shared::error`，此处仅做 re-export，
//! 并提供 handler 常用的成功响应辅助函数。

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// `{"code":0,"message":"OK"}` for endpoints without a body
pub fn ok() -> axum::Json<ApiResponse<()>> {
    axum::Json(ApiResponse::ok())
}
