//! Public customer menu
//!
//! `GET /api/menu` 无需认证

use axum::{Json, Router, extract::State, routing::get};

use crate::core::ServerState;
use crate::menu::MenuSection;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/menu", get(public_menu))
}

/// GET /api/menu - 可见菜品，按分类分组
pub async fn public_menu(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuSection>>> {
    let menu = state.menu_service().public_menu().await?;
    Ok(Json(menu))
}
