//! Order API Handlers
//!
//! [`OrderService`](crate::orders::OrderService) publishes the sync messages
//! of every write.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::order::{PlaceOrderRequest, ReplaceItemsRequest, TransitionRequest};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderFilter};
use crate::utils::AppResult;

/// GET /api/orders?status=pending,confirmed&table=4&from=2024-05-01&to=2024-05-02&active_only=true
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<OrderFilter>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.order_service().list(&filter).await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.order_service().get(&id).await?;
    Ok(Json(order))
}

/// POST /api/orders - 下单 (桌台自动占用)
pub async fn place(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(req): Json<PlaceOrderRequest>,
) -> AppResult<Json<Order>> {
    let outcome = state.order_service().place_order(req, &current_user).await?;
    Ok(Json(outcome.order))
}

/// PUT /api/orders/{id}/items - 整体替换菜品 (上菜前)
pub async fn replace_items(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<ReplaceItemsRequest>,
) -> AppResult<Json<Order>> {
    let outcome = state
        .order_service()
        .replace_items(&id, req, &current_user)
        .await?;
    Ok(Json(outcome.order))
}

/// POST /api/orders/{id}/transition - 状态流转
pub async fn transition(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<TransitionRequest>,
) -> AppResult<Json<Order>> {
    let outcome = state
        .order_service()
        .transition(&id, req, &current_user)
        .await?;
    Ok(Json(outcome.order))
}
