//! HTTP API
//!
//! | 前缀 | 模块 | 说明 |
//! |------|------|------|
//! | /health | [`health`] | 健康检查 (公开) |
//! | /api/auth | [`auth`] | 注册 / 登录 / 当前用户 |
//! | /api/menu | [`menu`] | 顾客菜单 (公开) |
//! | /api/menu-items | [`menu_items`] | 菜品管理 |
//! | /api/categories | [`categories`] | 分类管理 |
//! | /api/tables | [`tables`] | 桌台 |
//! | /api/orders | [`orders`] | 订单 |
//! | /api/staff | [`staff`] | 员工管理 (管理员) |
//! | /api/analytics | [`analytics`] | 营业汇总 |
//! | /api/sync | [`sync`] | WebSocket 推送 / 版本号 |

use std::time::Duration;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue, StatusCode};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::require_auth;
use crate::core::ServerState;

pub mod analytics;
pub mod auth;
pub mod categories;
pub mod health;
pub mod menu;
pub mod menu_items;
pub mod middleware;
pub mod orders;
pub mod staff;
pub mod sync;
pub mod tables;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// UUID v4 request ids
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Slow requests are cut off with 408
fn request_timeout(ms: u64) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, Duration::from_millis(ms))
}

/// All routes, no middleware, no state
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // 公开
        .merge(health::router())
        .merge(auth::router())
        .merge(menu::router())
        // 需要认证
        .merge(menu_items::router())
        .merge(categories::router())
        .merge(tables::router())
        .merge(orders::router())
        .merge(staff::router())
        .merge(analytics::router())
        .merge(sync::router())
}

/// Fully configured application
///
/// Used by the HTTP server and by tests driving the router with `oneshot`.
pub fn build_app(state: &ServerState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    build_router()
        // innermost: sees the authenticated user
        .layer(axum_middleware::from_fn(middleware::access_log))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
        .layer(request_timeout(state.config.request_timeout_ms))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, XRequestId))
        .with_state(state.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::routing::get;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_request_timeout_answers_408() {
        let app: Router = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    "late"
                }),
            )
            .route("/fast", get(|| async { "ok" }))
            .layer(request_timeout(20));

        let slow = http::Request::get("/slow").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(slow).await.unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

        let fast = http::Request::get("/fast").body(Body::empty()).unwrap();
        let response = app.oneshot(fast).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
