//! 请求日志中间件
//!
//! Runs inside `require_auth`, so the authenticated user is known.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};

use crate::auth::CurrentUser;

/// Log one line per request: request id, method, matched path, user,
/// status and latency. 4xx/5xx are logged at WARN.
pub async fn access_log(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .map(|u| u.username.clone());

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let latency_ms = start.elapsed().as_millis() as u64;

    if response.status().is_server_error() || response.status().is_client_error() {
        warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms,
            user = ?user,
            "Request failed"
        );
    } else {
        info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms,
            user = ?user,
            "Request completed"
        );
    }

    response
}
