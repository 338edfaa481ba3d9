//! Sync API 模块
//!
//! - `GET /api/sync/ws?token=<JWT>&resources=order,dining_table` - 实时推送
//! - `GET /api/sync/versions` - 各资源当前版本号 (重连后比对)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sync", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/ws", get(handler::websocket))
        .route("/versions", get(handler::versions))
}
