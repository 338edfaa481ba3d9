//! Staff administration API
//!
//! 全部路由需要 `staff:manage` 且为管理员

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::permissions::STAFF_MANAGE;
use crate::auth::{require_admin, require_permission};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/staff", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/approve", post(handler::approve))
        .route("/{id}/reject", post(handler::reject))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn(require_permission(STAFF_MANAGE)))
}
