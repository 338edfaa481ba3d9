//! Menu Item API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{MenuItemCreate, MenuItemQuery, MenuItemUpdate};

use crate::core::ServerState;
use crate::db::models::MenuItem;
use crate::utils::AppResult;

const RESOURCE: &str = "menu_item";

/// GET /api/menu-items?category=Mains&visible_only=true
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MenuItemQuery>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let items = state.menu_service().list_items(&query).await?;
    Ok(Json(items))
}

/// GET /api/menu-items/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MenuItem>> {
    let item = state.menu_service().get_item(&id).await?;
    Ok(Json(item))
}

/// POST /api/menu-items
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    let item = state.menu_service().create_item(payload).await?;

    state.broadcast_sync(RESOURCE, "created", &item.id_string(), Some(&item));

    Ok(Json(item))
}

/// PUT /api/menu-items/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    let item = state.menu_service().update_item(&id, payload).await?;

    state.broadcast_sync(RESOURCE, "updated", &item.id_string(), Some(&item));

    Ok(Json(item))
}

/// DELETE /api/menu-items/{id}
///
/// Existing orders keep their snapshot of the item.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let item = state.menu_service().delete_item(&id).await?;

    state.broadcast_sync::<()>(RESOURCE, "deleted", &item.id_string(), None);

    Ok(Json(true))
}
