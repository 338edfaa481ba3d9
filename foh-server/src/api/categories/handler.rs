//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{CategoryCreate, CategoryUpdate};

use crate::core::ServerState;
use crate::db::models::Category;
use crate::utils::AppResult;

const RESOURCE: &str = "category";
const MENU_ITEM_RESOURCE: &str = "menu_item";

/// GET /api/categories
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let categories = state.menu_service().list_categories().await?;
    Ok(Json(categories))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    let category = state.menu_service().get_category(&id).await?;
    Ok(Json(category))
}

/// POST /api/categories
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    let category = state.menu_service().create_category(payload).await?;

    state.broadcast_sync(RESOURCE, "created", &category.id_string(), Some(&category));

    Ok(Json(category))
}

/// PUT /api/categories/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    let change = state.menu_service().update_category(&id, payload).await?;

    let category = change.category;
    state.broadcast_sync(RESOURCE, "updated", &category.id_string(), Some(&category));
    for item in &change.renamed_items {
        state.broadcast_sync(MENU_ITEM_RESOURCE, "updated", &item.id_string(), Some(item));
    }

    Ok(Json(category))
}

/// DELETE /api/categories/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let category = state.menu_service().delete_category(&id).await?;

    state.broadcast_sync::<()>(RESOURCE, "deleted", &category.id_string(), None);

    Ok(Json(true))
}
