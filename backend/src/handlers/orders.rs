//! HTTP handlers for order settlement endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use shared::{DraftOrder, OrderSummary, SaleRecord};

use crate::error::AppResult;
use crate::handlers::DateRangeQuery;
use crate::services::order::{
    OrderService, SettlementReceipt, UpdateOrderInput, UpdatePromotionInput,
};
use crate::AppState;

/// Commit a draft order
pub async fn commit_order(
    State(state): State<AppState>,
    Json(draft): Json<DraftOrder>,
) -> AppResult<Json<SettlementReceipt>> {
    let service = OrderService::new(state.db);
    let receipt = service.commit(draft).await?;
    Ok(Json(receipt))
}

/// Reverse (delete) a committed order
pub async fn reverse_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<()>> {
    let service = OrderService::new(state.db);
    service.reverse(&order_id).await?;
    Ok(Json(()))
}

/// Edit an order's promotion after commit
pub async fn update_promotion(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Json(input): Json<UpdatePromotionInput>,
) -> AppResult<Json<Vec<SaleRecord>>> {
    let service = OrderService::new(state.db);
    let records = service.update_promotion(&order_id, input).await?;
    Ok(Json(records))
}

/// Edit an order's id or timestamp after commit
pub async fn update_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Json(input): Json<UpdateOrderInput>,
) -> AppResult<Json<()>> {
    let service = OrderService::new(state.db);
    service.update_order(&order_id, input).await?;
    Ok(Json(()))
}

/// List orders in a date range
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<OrderSummary>>> {
    let range = query.into_range()?;
    let service = OrderService::new(state.db);
    let orders = service.list_orders(&range).await?;
    Ok(Json(orders))
}

/// Get one order's line items
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<Vec<SaleRecord>>> {
    let service = OrderService::new(state.db);
    let records = service.get_order(&order_id).await?;
    Ok(Json(records))
}
