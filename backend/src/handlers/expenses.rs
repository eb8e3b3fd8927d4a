//! HTTP handlers for operational cost endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use shared::Expense;

use crate::error::AppResult;
use crate::handlers::DateRangeQuery;
use crate::services::expense::{CategoryTotal, ExpenseInput, ExpenseService};
use crate::AppState;

/// Record an operational cost entry
pub async fn create_expense(
    State(state): State<AppState>,
    Json(input): Json<ExpenseInput>,
) -> AppResult<Json<Expense>> {
    let service = ExpenseService::new(state.db);
    let expense = service.create(input).await?;
    Ok(Json(expense))
}

/// Replace an expense entry
pub async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ExpenseInput>,
) -> AppResult<Json<Expense>> {
    let service = ExpenseService::new(state.db);
    let expense = service.update(id, input).await?;
    Ok(Json(expense))
}

/// Delete an expense entry
pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = ExpenseService::new(state.db);
    service.delete(id).await?;
    Ok(Json(()))
}

/// List expenses in a date range
pub async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<Expense>>> {
    let range = query.into_range()?;
    let service = ExpenseService::new(state.db);
    let expenses = service.list(&range).await?;
    Ok(Json(expenses))
}

/// Expense totals per category over a date range
pub async fn expense_breakdown(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<CategoryTotal>>> {
    let range = query.into_range()?;
    let service = ExpenseService::new(state.db);
    let breakdown = service.breakdown(&range).await?;
    Ok(Json(breakdown))
}
