//! Inventory ledger service: purchases, adjustments, the stock movement
//! journal, and low-stock evaluation.
//!
//! The ledger is keyed by ingredient name. Quantities never go negative
//! through a consumption; the clamping arithmetic lives in `shared::ledger`
//! and the settlement path applies it inside its own transaction (see the
//! order service).

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use shared::{
    is_low_stock, weighted_average_cost, Ingredient, MovementDirection, MovementReason,
    StockMovement, StockThresholds, Unit,
};

use crate::error::{AppError, AppResult};

/// Inventory service for the ingredient ledger
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// Ledger row as stored; the unit is text in the database.
#[derive(Debug, FromRow)]
struct IngredientRow {
    name: String,
    quantity: Decimal,
    unit: String,
    avg_cost: Decimal,
    last_updated: chrono::NaiveDate,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Ingredient {
            name: row.name,
            quantity: row.quantity,
            unit: Unit::parse(&row.unit),
            avg_cost: row.avg_cost,
            last_updated: row.last_updated,
        }
    }
}

#[derive(Debug, FromRow)]
struct MovementRow {
    id: Uuid,
    ingredient: String,
    direction: String,
    quantity: Decimal,
    reason: String,
    order_id: Option<String>,
    created_at: chrono::DateTime<Utc>,
}

impl From<MovementRow> for StockMovement {
    fn from(row: MovementRow) -> Self {
        StockMovement {
            id: row.id,
            ingredient: row.ingredient,
            direction: if row.direction == "in" {
                MovementDirection::In
            } else {
                MovementDirection::Out
            },
            quantity: row.quantity,
            reason: MovementReason::parse(&row.reason).unwrap_or(MovementReason::Adjustment),
            order_id: row.order_id,
            created_at: row.created_at,
        }
    }
}

/// Input for recording an ingredient purchase
#[derive(Debug, Deserialize)]
pub struct RecordPurchaseInput {
    pub name: String,
    /// Quantity purchased, in the ingredient's unit
    pub amount: Decimal,
    /// Total money paid for the whole purchase, not per unit
    pub total_cost: Decimal,
    /// Required for a brand-new ingredient; ignored for an existing one
    pub unit: Option<String>,
}

/// Input for a manual stock correction
#[derive(Debug, Deserialize)]
pub struct AdjustQuantityInput {
    pub quantity: Decimal,
}

/// One ingredient at or below its category threshold
#[derive(Debug, Serialize)]
pub struct LowStockItem {
    pub name: String,
    pub quantity: Decimal,
    pub unit: Unit,
    pub threshold: Decimal,
}

/// Whole-ledger valuation
#[derive(Debug, Serialize)]
pub struct InventorySummary {
    pub ingredient_count: i64,
    pub total_value: Decimal,
}

impl InventoryService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List the whole ledger, alphabetically.
    pub async fn list_ingredients(&self) -> AppResult<Vec<Ingredient>> {
        let rows = sqlx::query_as::<_, IngredientRow>(
            r#"
            SELECT name, quantity, unit, avg_cost, last_updated
            FROM ingredients
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Ingredient::from).collect())
    }

    /// Get one ingredient by exact name.
    pub async fn get_ingredient(&self, name: &str) -> AppResult<Ingredient> {
        let row = sqlx::query_as::<_, IngredientRow>(
            "SELECT name, quantity, unit, avg_cost, last_updated FROM ingredients WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Ingredient".to_string()))?;

        Ok(row.into())
    }

    /// Record a purchase: increase quantity and recompute the weighted
    /// average unit cost. A brand-new ingredient is created with the
    /// purchase's own unit cost as its average.
    pub async fn record_purchase(&self, input: RecordPurchaseInput) -> AppResult<Ingredient> {
        shared::validate_purchase(&input.name, input.amount, input.total_cost)?;

        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, IngredientRow>(
            r#"
            SELECT name, quantity, unit, avg_cost, last_updated
            FROM ingredients WHERE name = $1
            FOR UPDATE
            "#,
        )
        .bind(&input.name)
        .fetch_optional(&mut *tx)
        .await?;

        let today = Utc::now().date_naive();
        let row = match existing {
            Some(row) => {
                let new_avg =
                    weighted_average_cost(row.quantity, row.avg_cost, input.amount, input.total_cost);
                sqlx::query_as::<_, IngredientRow>(
                    r#"
                    UPDATE ingredients
                    SET quantity = quantity + $2, avg_cost = $3, last_updated = $4
                    WHERE name = $1
                    RETURNING name, quantity, unit, avg_cost, last_updated
                    "#,
                )
                .bind(&input.name)
                .bind(input.amount)
                .bind(new_avg)
                .bind(today)
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                let unit = input.unit.as_deref().ok_or(AppError::Validation {
                    field: "unit".to_string(),
                    message: "Unit is required for a new ingredient".to_string(),
                })?;
                let avg_cost = input.total_cost / input.amount;
                sqlx::query_as::<_, IngredientRow>(
                    r#"
                    INSERT INTO ingredients (name, quantity, unit, avg_cost, last_updated)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING name, quantity, unit, avg_cost, last_updated
                    "#,
                )
                .bind(&input.name)
                .bind(input.amount)
                .bind(Unit::parse(unit).code())
                .bind(avg_cost)
                .bind(today)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        record_movement(
            &mut tx,
            &input.name,
            MovementDirection::In,
            input.amount,
            MovementReason::Purchase,
            None,
        )
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Set an ingredient's quantity outright. The delta is journaled as an
    /// adjustment so the movement history stays complete.
    pub async fn adjust_quantity(
        &self,
        name: &str,
        input: AdjustQuantityInput,
    ) -> AppResult<Ingredient> {
        if input.quantity < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Quantity cannot be negative".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, IngredientRow>(
            r#"
            SELECT name, quantity, unit, avg_cost, last_updated
            FROM ingredients WHERE name = $1
            FOR UPDATE
            "#,
        )
        .bind(name)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Ingredient".to_string()))?;

        let row = sqlx::query_as::<_, IngredientRow>(
            r#"
            UPDATE ingredients
            SET quantity = $2, last_updated = $3
            WHERE name = $1
            RETURNING name, quantity, unit, avg_cost, last_updated
            "#,
        )
        .bind(name)
        .bind(input.quantity)
        .bind(Utc::now().date_naive())
        .fetch_one(&mut *tx)
        .await?;

        let delta = input.quantity - existing.quantity;
        if !delta.is_zero() {
            let direction = if delta > Decimal::ZERO {
                MovementDirection::In
            } else {
                MovementDirection::Out
            };
            record_movement(
                &mut tx,
                name,
                direction,
                delta.abs(),
                MovementReason::Adjustment,
                None,
            )
            .await?;
        }

        tx.commit().await?;

        Ok(row.into())
    }

    /// Movement journal for one ingredient, newest first.
    pub async fn get_movements(&self, ingredient: &str) -> AppResult<Vec<StockMovement>> {
        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT id, ingredient, direction, quantity, reason, order_id, created_at
            FROM stock_movements
            WHERE ingredient = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(ingredient)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(StockMovement::from).collect())
    }

    /// Ingredients at or below their category threshold. Quantities are
    /// normalized to base units before comparison; ingredients with an
    /// unrecognized unit are skipped with a logged anomaly.
    pub async fn low_stock(&self, thresholds: &StockThresholds) -> AppResult<Vec<LowStockItem>> {
        let ingredients = self.list_ingredients().await?;
        let mut items = Vec::new();

        for ingredient in ingredients {
            match is_low_stock(ingredient.quantity, &ingredient.unit, thresholds) {
                Some(true) => {
                    // A verdict implies the unit has a class.
                    if let Some(class) = ingredient.unit.class() {
                        items.push(LowStockItem {
                            name: ingredient.name,
                            quantity: ingredient.quantity,
                            unit: ingredient.unit,
                            threshold: thresholds.for_class(class),
                        });
                    }
                }
                Some(false) => {}
                None => {
                    tracing::warn!(
                        ingredient = %ingredient.name,
                        unit = %ingredient.unit,
                        "skipping low-stock check for unrecognized unit"
                    );
                }
            }
        }

        Ok(items)
    }

    /// Ledger valuation: sum of quantity x average cost across ingredients.
    pub async fn summary(&self) -> AppResult<InventorySummary> {
        let row = sqlx::query_as::<_, (i64, Option<Decimal>)>(
            "SELECT COUNT(*), SUM(quantity * avg_cost) FROM ingredients",
        )
        .fetch_one(&self.db)
        .await?;

        Ok(InventorySummary {
            ingredient_count: row.0,
            total_value: row.1.unwrap_or(Decimal::ZERO),
        })
    }
}

/// Append a row to the stock movement journal within a transaction. Every
/// ledger mutation goes through here; the journal is what makes order
/// reversal exact.
pub(crate) async fn record_movement(
    tx: &mut Transaction<'_, Postgres>,
    ingredient: &str,
    direction: MovementDirection,
    quantity: Decimal,
    reason: MovementReason,
    order_id: Option<&str>,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO stock_movements (ingredient, direction, quantity, reason, order_id)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(ingredient)
    .bind(direction.as_str())
    .bind(quantity)
    .bind(reason.as_str())
    .bind(order_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
