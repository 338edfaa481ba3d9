//! Order API 模块
//!
//! 权限按目标状态在 [`crate::orders::OrderService`] 内检查，
//! 路由层只要求登录。

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::place))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/items", put(handler::replace_items))
        .route("/{id}/transition", post(handler::transition))
}
