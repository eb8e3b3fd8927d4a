//! HTTP handlers for the product catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use shared::{Product, RecipeLine};

use crate::error::AppResult;
use crate::services::product::{ProductService, ProductSummary, SaveProductInput};
use crate::services::recipe::RecipeService;
use crate::AppState;

/// List the product catalog with profit figures
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<ProductSummary>>> {
    let service = ProductService::new(state.db);
    let products = service.list().await?;
    Ok(Json(products))
}

/// Get one product by name
pub async fn get_product(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.get(&name).await?;
    Ok(Json(product))
}

/// Upsert a product together with its recipe
pub async fn save_product(
    State(state): State<AppState>,
    Json(input): Json<SaveProductInput>,
) -> AppResult<Json<ProductSummary>> {
    let service = ProductService::new(state.db);
    let product = service.save(input).await?;
    Ok(Json(product))
}

/// Delete a product and its recipe
pub async fn delete_product(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<()>> {
    let service = ProductService::new(state.db);
    service.delete(&name).await?;
    Ok(Json(()))
}

/// Get a product's recipe; empty for recipe-less products
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<Vec<RecipeLine>>> {
    let service = RecipeService::new(state.db);
    let lines = service.resolve(&name).await?;
    Ok(Json(lines))
}
