//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{IdRequest, OrderPage, OrderPlaced, PlaceOrderRequest};
use shared::response::PageQuery;

use crate::auth::{Caller, CurrentAdmin, CurrentCustomer};
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

/// POST /orders/make - 下单
pub async fn place(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
    Json(req): Json<PlaceOrderRequest>,
) -> AppResult<ApiResponse<OrderPlaced>> {
    let placed = state.orders.place_order(&customer.id, &req.products).await?;
    Ok(ApiResponse::success_with_message(
        "Your Order has been made",
        placed,
    ))
}

/// GET /orders/get?page=n - 当前客户的订单
pub async fn list_mine(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<OrderPage>> {
    let page = state
        .orders
        .list_for_customer(&customer.id, query.page(), state.config.page_size)
        .await?;
    Ok(ApiResponse::success(page))
}

/// DELETE /orders/delete/{id} - 取消订单并归还库存
pub async fn cancel(
    State(state): State<ServerState>,
    caller: Caller,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.orders.cancel(&id, &caller).await?;
    Ok(ApiResponse::ok("Order Cancelled"))
}

/// POST /orders/received - 管理员确认签收
pub async fn received(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Json(req): Json<IdRequest>,
) -> AppResult<ApiResponse<()>> {
    state.orders.mark_received(&req.id).await?;
    Ok(ApiResponse::ok("The Order is received"))
}
