//! HTTP handlers for the ingredient ledger endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use shared::{Ingredient, StockMovement};

use crate::error::AppResult;
use crate::services::inventory::{
    AdjustQuantityInput, InventoryService, InventorySummary, LowStockItem, RecordPurchaseInput,
};
use crate::AppState;

/// List the whole ingredient ledger
pub async fn list_ingredients(State(state): State<AppState>) -> AppResult<Json<Vec<Ingredient>>> {
    let service = InventoryService::new(state.db);
    let ingredients = service.list_ingredients().await?;
    Ok(Json(ingredients))
}

/// Get one ingredient by name
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<Ingredient>> {
    let service = InventoryService::new(state.db);
    let ingredient = service.get_ingredient(&name).await?;
    Ok(Json(ingredient))
}

/// Record an ingredient purchase
pub async fn record_purchase(
    State(state): State<AppState>,
    Json(input): Json<RecordPurchaseInput>,
) -> AppResult<Json<Ingredient>> {
    let service = InventoryService::new(state.db);
    let ingredient = service.record_purchase(input).await?;
    Ok(Json(ingredient))
}

/// Set an ingredient's quantity outright (manual correction)
pub async fn adjust_quantity(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(input): Json<AdjustQuantityInput>,
) -> AppResult<Json<Ingredient>> {
    let service = InventoryService::new(state.db);
    let ingredient = service.adjust_quantity(&name, input).await?;
    Ok(Json(ingredient))
}

/// Movement journal for one ingredient
pub async fn get_movements(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<Vec<StockMovement>>> {
    let service = InventoryService::new(state.db);
    let movements = service.get_movements(&name).await?;
    Ok(Json(movements))
}

/// Ingredients at or below their category threshold
pub async fn low_stock(State(state): State<AppState>) -> AppResult<Json<Vec<LowStockItem>>> {
    let thresholds = state.config.alerts.thresholds();
    let service = InventoryService::new(state.db);
    let items = service.low_stock(&thresholds).await?;
    Ok(Json(items))
}

/// Whole-ledger valuation
pub async fn inventory_summary(State(state): State<AppState>) -> AppResult<Json<InventorySummary>> {
    let service = InventoryService::new(state.db);
    let summary = service.summary().await?;
    Ok(Json(summary))
}
