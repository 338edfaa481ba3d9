//! Dining Table API Handlers
//!
//! Writes are published by [`TableService`](crate::tables::TableService)
//! under the table lock.

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{DiningTableCreate, DiningTableUpdate, TableStatusUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::DiningTable;
use crate::utils::{AppError, AppResult};

/// GET /api/tables - 获取所有桌台 (按桌号排序)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = state.table_service().list().await?;
    Ok(Json(tables))
}

/// GET /api/tables/{id} - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DiningTable>> {
    let table = state.table_service().get(&id).await?;
    Ok(Json(table))
}

/// POST /api/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    let table = state.table_service().create(payload).await?;
    Ok(Json(table))
}

/// PUT /api/tables/{id} - 更新桌号 / 座位数
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    let table = state.table_service().update(&id, payload).await?;
    Ok(Json(table))
}

/// PUT /api/tables/{id}/status - 手动修改桌台状态
pub async fn set_status(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<TableStatusUpdate>,
) -> AppResult<Json<DiningTable>> {
    let table = state
        .table_service()
        .set_status(&id, payload.status, &current_user)
        .await?;
    Ok(Json(table))
}

/// DELETE /api/tables/{id} - 删除桌台 (无进行中订单)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    state.table_service().delete(&id).await?;
    Ok(Json(true))
}

/// POST /api/tables/reconcile - 按进行中订单修正桌台状态
pub async fn reconcile(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let fixed = state
        .order_service()
        .reconcile_tables()
        .await
        .map_err(AppError::from)?;
    Ok(Json(fixed))
}
