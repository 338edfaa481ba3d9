//! Dining Table API 模块
//!
//! | 路径 | 方法 | 权限 |
//! |------|------|------|
//! | /api/tables | GET | 登录即可 |
//! | /api/tables/{id} | GET | 登录即可 |
//! | /api/tables | POST | tables:manage |
//! | /api/tables/{id} | PUT / DELETE | tables:manage |
//! | /api/tables/reconcile | POST | tables:manage |
//! | /api/tables/{id}/status | PUT | tables:status |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::permissions::{TABLES_MANAGE, TABLES_STATUS};
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tables", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/reconcile", post(handler::reconcile))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_permission(TABLES_MANAGE)));

    let status_routes = Router::new()
        .route("/{id}/status", put(handler::set_status))
        .layer(middleware::from_fn(require_permission(TABLES_STATUS)));

    read_routes.merge(manage_routes).merge(status_routes)
}
