//! Product catalog: upsert with atomic recipe replacement and cached COGS.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use shared::{validate_recipe_line, validate_unit_compatibility, Product, RecipeLine, Unit};

use crate::error::{AppError, AppResult};
use crate::services::recipe;

/// Product catalog service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct ProductRow {
    name: String,
    price: Decimal,
    category: String,
    cogs: Decimal,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            name: row.name,
            price: row.price,
            category: row.category,
            cogs: row.cogs,
        }
    }
}

/// One recipe line as submitted by the caller
#[derive(Debug, Deserialize)]
pub struct RecipeLineInput {
    pub ingredient: String,
    pub quantity: Decimal,
    pub unit: String,
}

/// Input for saving a product together with its recipe
#[derive(Debug, Deserialize)]
pub struct SaveProductInput {
    pub name: String,
    pub price: Decimal,
    pub category: Option<String>,
    pub recipe: Vec<RecipeLineInput>,
}

/// Product as listed, with derived per-unit profit figures
#[derive(Debug, Serialize)]
pub struct ProductSummary {
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub cogs: Decimal,
    pub profit: Decimal,
    pub margin_percent: Decimal,
}

impl From<Product> for ProductSummary {
    fn from(product: Product) -> Self {
        ProductSummary {
            profit: product.profit(),
            margin_percent: product.margin_percent(),
            name: product.name,
            price: product.price,
            category: product.category,
            cogs: product.cogs,
        }
    }
}

impl ProductService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List the catalog with derived profit and margin per product.
    pub async fn list(&self) -> AppResult<Vec<ProductSummary>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT name, price, category, cogs FROM products ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ProductSummary::from(Product::from(row)))
            .collect())
    }

    /// Get one product by exact name.
    pub async fn get(&self, name: &str) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT name, price, category, cogs FROM products WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// Upsert a product and replace its recipe in one transaction. The
    /// product's COGS is recomputed from the new recipe at the ledger's
    /// current average costs and cached on the row; historical sales keep
    /// their own snapshots.
    pub async fn save(&self, input: SaveProductInput) -> AppResult<ProductSummary> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Product name is empty".to_string(),
            });
        }
        if input.price < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "price".to_string(),
                message: "Price cannot be negative".to_string(),
            });
        }
        for line in &input.recipe {
            validate_recipe_line(&line.ingredient, line.quantity)?;
        }

        let lines: Vec<RecipeLine> = input
            .recipe
            .iter()
            .map(|line| RecipeLine {
                product: input.name.clone(),
                ingredient: line.ingredient.clone(),
                quantity: line.quantity,
                unit: Unit::parse(&line.unit),
            })
            .collect();
        let category = input.category.unwrap_or_else(|| "Other".to_string());

        let mut tx = self.db.begin().await?;

        // A line may use kg or l against a g or ml ledger, but never a unit
        // with a different base; that would make its consumption meaningless.
        for line in &lines {
            let ledger_unit = sqlx::query_scalar::<_, String>(
                "SELECT unit FROM ingredients WHERE name = $1",
            )
            .bind(&line.ingredient)
            .fetch_optional(&mut *tx)
            .await?;
            if let Some(unit) = ledger_unit {
                validate_unit_compatibility(&line.unit, &Unit::parse(&unit))?;
            }
        }

        sqlx::query(
            r#"
            INSERT INTO products (name, price, category, cogs)
            VALUES ($1, $2, $3, 0)
            ON CONFLICT (name) DO UPDATE SET price = $2, category = $3
            "#,
        )
        .bind(&input.name)
        .bind(input.price)
        .bind(&category)
        .execute(&mut *tx)
        .await?;

        recipe::replace_in_tx(&mut tx, &input.name, &lines).await?;

        let cogs = recipe::compute_cogs(&mut tx, &input.name).await?;
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products SET cogs = $2 WHERE name = $1
            RETURNING name, price, category, cogs
            "#,
        )
        .bind(&input.name)
        .bind(cogs)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ProductSummary::from(Product::from(row)))
    }

    /// Delete a product and its recipe. Past sales of the product stay.
    pub async fn delete(&self, name: &str) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let result = sqlx::query("DELETE FROM products WHERE name = $1")
            .bind(name)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        sqlx::query("DELETE FROM recipes WHERE product = $1")
            .bind(name)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
