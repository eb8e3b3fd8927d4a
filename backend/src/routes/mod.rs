//! Route definitions for the café back-office API

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Ingredient ledger
        .nest("/ingredients", ingredient_routes())
        // Product catalog and recipes
        .nest("/products", product_routes())
        // Order settlement
        .nest("/orders", order_routes())
        // Operational costs
        .nest("/expenses", expense_routes())
        // Financial reporting
        .nest("/reports", report_routes())
}

/// Ingredient ledger routes
fn ingredient_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_ingredients))
        .route("/purchases", post(handlers::record_purchase))
        .route("/low-stock", get(handlers::low_stock))
        .route("/summary", get(handlers::inventory_summary))
        .route("/:name", get(handlers::get_ingredient))
        .route("/:name/quantity", put(handlers::adjust_quantity))
        .route("/:name/movements", get(handlers::get_movements))
}

/// Product catalog routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).put(handlers::save_product))
        .route(
            "/:name",
            get(handlers::get_product).delete(handlers::delete_product),
        )
        .route("/:name/recipe", get(handlers::get_recipe))
}

/// Order settlement routes
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::commit_order))
        .route(
            "/:order_id",
            get(handlers::get_order)
                .put(handlers::update_order)
                .delete(handlers::reverse_order),
        )
        .route("/:order_id/promotion", put(handlers::update_promotion))
}

/// Operational cost routes
fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_expenses).post(handlers::create_expense))
        .route("/breakdown", get(handlers::expense_breakdown))
        .route(
            "/:expense_id",
            put(handlers::update_expense).delete(handlers::delete_expense),
        )
}

/// Financial reporting routes
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/profit-and-loss", get(handlers::profit_and_loss))
        .route("/products", get(handlers::product_profitability))
        .route("/daily", get(handlers::daily_series))
}
