//! HTTP handlers for financial reporting endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use shared::{ProductProfit, ProfitAndLoss};

use crate::error::AppResult;
use crate::handlers::DateRangeQuery;
use crate::services::reporting::{DailyPoint, ReportingService};
use crate::AppState;

/// Layered profit and loss over a date range
pub async fn profit_and_loss(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<ProfitAndLoss>> {
    let range = query.into_range()?;
    let service = ReportingService::new(state.db);
    let summary = service.profit_and_loss(&range).await?;
    Ok(Json(summary))
}

/// Per-product profitability, most profitable first
pub async fn product_profitability(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<ProductProfit>>> {
    let range = query.into_range()?;
    let service = ReportingService::new(state.db);
    let products = service.product_profitability(&range).await?;
    Ok(Json(products))
}

/// Daily revenue and gross profit series
pub async fn daily_series(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<DailyPoint>>> {
    let range = query.into_range()?;
    let service = ReportingService::new(state.db);
    let series = service.daily_series(&range).await?;
    Ok(Json(series))
}
