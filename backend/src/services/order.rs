//! Order settlement engine: commit, compensating reversal, and post-commit
//! edits to promotion and order metadata.
//!
//! Commit runs resolve -> consume -> persist as one transaction, so a
//! persistence failure rolls the ledger back. Ingredient shortages do NOT
//! abort a commit; they clamp the ledger at zero and come back as warnings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::{
    allocate, consume, validate_draft_order, validate_promo_amount, DateRange, DraftOrder,
    MovementDirection, MovementReason, OrderSummary, SaleRecord, SettlementWarning, Unit,
};

use crate::error::{AppError, AppResult};
use crate::services::inventory::record_movement;
use crate::services::recipe;

/// Order settlement service
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct SaleRow {
    id: Uuid,
    date: DateTime<Utc>,
    order_id: String,
    product: String,
    quantity: Decimal,
    unit_price: Decimal,
    total: Decimal,
    promo: Decimal,
    net_total: Decimal,
    cogs_snapshot: Option<Decimal>,
    location: Option<String>,
}

impl From<SaleRow> for SaleRecord {
    fn from(row: SaleRow) -> Self {
        SaleRecord {
            id: row.id,
            date: row.date,
            order_id: row.order_id,
            product: row.product,
            quantity: row.quantity,
            unit_price: row.unit_price,
            total: row.total,
            promo: row.promo,
            net_total: row.net_total,
            cogs_snapshot: row.cogs_snapshot,
            location: row.location,
        }
    }
}

/// Result of a committed order, warnings included
#[derive(Debug, Serialize)]
pub struct SettlementReceipt {
    pub order_id: String,
    pub date: DateTime<Utc>,
    pub gross_total: Decimal,
    pub promo: Decimal,
    pub net_total: Decimal,
    pub warnings: Vec<SettlementWarning>,
}

/// Input for editing an order's promotion after commit
#[derive(Debug, Deserialize)]
pub struct UpdatePromotionInput {
    pub promo_amount: Decimal,
}

/// Input for editing an order's id or timestamp after commit
#[derive(Debug, Deserialize)]
pub struct UpdateOrderInput {
    pub order_id: Option<String>,
    pub placed_at: Option<DateTime<Utc>>,
}

impl OrderService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Commit a draft order: expand recipes, consume ingredients with
    /// soft-fail clamping, allocate the promotion, and persist one sale row
    /// per line item. Returns the receipt with any accumulated warnings.
    pub async fn commit(&self, draft: DraftOrder) -> AppResult<SettlementReceipt> {
        validate_draft_order(&draft)?;

        let order_id = match &draft.order_id {
            Some(id) => id.trim().to_string(),
            None => generate_order_id(),
        };

        let date = draft.placed_at.unwrap_or_else(Utc::now);
        let mut warnings: Vec<SettlementWarning> = Vec::new();

        let mut tx = self.db.begin().await?;

        // Serialize commits sharing an order id for the rest of this
        // transaction; the EXISTS check is only sound under this lock.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1)::bigint)")
            .bind(&order_id)
            .execute(&mut *tx)
            .await?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM sales WHERE order_id = $1)",
        )
        .bind(&order_id)
        .fetch_one(&mut *tx)
        .await?;
        if exists {
            return Err(AppError::DuplicateEntry("order_id".to_string()));
        }

        // Consume ingredients line by line. Each ingredient row is locked
        // before its quantity is read, serializing concurrent settlements
        // per ingredient.
        for item in &draft.items {
            let lines = recipe::resolve_in_tx(&mut tx, &item.product).await?;

            for line in lines {
                let row = sqlx::query_as::<_, (Decimal, String)>(
                    "SELECT quantity, unit FROM ingredients WHERE name = $1 FOR UPDATE",
                )
                .bind(&line.ingredient)
                .fetch_optional(&mut *tx)
                .await?;

                let (available, ledger_unit) = match row {
                    Some((quantity, unit)) => (quantity, Unit::parse(&unit)),
                    None => {
                        tracing::warn!(
                            product = %item.product,
                            ingredient = %line.ingredient,
                            "recipe references an ingredient absent from the ledger; skipped"
                        );
                        warnings.push(SettlementWarning::MissingIngredient {
                            product: item.product.clone(),
                            ingredient: line.ingredient.clone(),
                        });
                        continue;
                    }
                };

                // Recipe lines may be denominated in kg or l against a g or
                // ml ledger; consumption happens in the ledger's unit.
                let expanded = line.consumption_for(item.quantity);
                let required = match line.unit.convert(expanded, &ledger_unit) {
                    Some(quantity) => quantity,
                    None => {
                        tracing::warn!(
                            product = %item.product,
                            ingredient = %line.ingredient,
                            recipe_unit = %line.unit,
                            ledger_unit = %ledger_unit,
                            "recipe unit shares no base unit with the ledger; skipped"
                        );
                        warnings.push(SettlementWarning::UnitMismatch {
                            product: item.product.clone(),
                            ingredient: line.ingredient.clone(),
                            recipe_unit: line.unit.clone(),
                            ledger_unit,
                        });
                        continue;
                    }
                };

                let result = consume(available, required);
                if result.is_short() {
                    tracing::warn!(
                        ingredient = %line.ingredient,
                        requested = %required,
                        applied = %result.applied,
                        "insufficient stock; ledger clamped to zero"
                    );
                    warnings.push(SettlementWarning::Shortage {
                        ingredient: line.ingredient.clone(),
                        requested: required,
                        applied: result.applied,
                        shortage: result.shortage,
                    });
                }

                sqlx::query(
                    "UPDATE ingredients SET quantity = $2, last_updated = $3 WHERE name = $1",
                )
                .bind(&line.ingredient)
                .bind(available - result.applied)
                .bind(date.date_naive())
                .execute(&mut *tx)
                .await?;

                if !result.applied.is_zero() {
                    record_movement(
                        &mut tx,
                        &line.ingredient,
                        MovementDirection::Out,
                        result.applied,
                        MovementReason::Sale,
                        Some(&order_id),
                    )
                    .await?;
                }
            }
        }

        // Allocate the promotion over the full line set, then persist.
        let totals: Vec<Decimal> = draft.items.iter().map(|i| i.total).collect();
        let shares = allocate(&totals, draft.promo_amount);

        for (index, (item, share)) in draft.items.iter().zip(&shares).enumerate() {
            let cogs_snapshot = sqlx::query_scalar::<_, Decimal>(
                "SELECT cogs FROM products WHERE name = $1",
            )
            .bind(&item.product)
            .fetch_optional(&mut *tx)
            .await?;

            // Location rides on the first record of the order only.
            let location = if index == 0 {
                draft.location.as_deref()
            } else {
                None
            };

            sqlx::query(
                r#"
                INSERT INTO sales
                    (date, order_id, product, quantity, unit_price, total,
                     promo, net_total, cogs_snapshot, location, line_no)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(date)
            .bind(&order_id)
            .bind(&item.product)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.total)
            .bind(*share)
            .bind(item.total - *share)
            .bind(cogs_snapshot)
            .bind(location)
            .bind(index as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let gross_total = draft.gross_total();
        Ok(SettlementReceipt {
            order_id,
            date,
            gross_total,
            promo: draft.promo_amount,
            net_total: gross_total - draft.promo_amount,
            warnings,
        })
    }

    /// Reverse (delete) a committed order: restore every ingredient by the
    /// exact quantities its consumption movements recorded, then delete the
    /// sale rows. Orders persisted before the journal existed fall back to
    /// restoring via the current recipe.
    pub async fn reverse(&self, order_id: &str) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let sale_rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, date, order_id, product, quantity, unit_price, total,
                   promo, net_total, cogs_snapshot, location
            FROM sales
            WHERE order_id = $1
            ORDER BY line_no
            FOR UPDATE
            "#,
        )
        .bind(order_id)
        .fetch_all(&mut *tx)
        .await?;

        if sale_rows.is_empty() {
            return Err(AppError::NotFound("Order".to_string()));
        }

        let consumed = sqlx::query_as::<_, (String, Decimal)>(
            r#"
            SELECT ingredient, quantity
            FROM stock_movements
            WHERE order_id = $1 AND direction = 'out' AND reason = 'sale'
              AND NOT reversed
            "#,
        )
        .bind(order_id)
        .fetch_all(&mut *tx)
        .await?;

        if !consumed.is_empty() {
            // Journal quantities are already in each ingredient's ledger unit.
            for (ingredient, quantity) in &consumed {
                restore_ingredient(&mut tx, ingredient, *quantity, None, order_id).await?;
            }
            sqlx::query(
                r#"
                UPDATE stock_movements SET reversed = TRUE
                WHERE order_id = $1 AND direction = 'out' AND reason = 'sale'
                "#,
            )
            .bind(order_id)
            .execute(&mut *tx)
            .await?;
        } else {
            // Legacy order with no journal rows: the current recipe is the
            // best available approximation of what was consumed.
            tracing::warn!(order_id, "no consumption journal; restoring via current recipe");
            for row in &sale_rows {
                let lines = recipe::resolve_in_tx(&mut tx, &row.product).await?;
                for line in lines {
                    let quantity = line.consumption_for(row.quantity);
                    restore_ingredient(&mut tx, &line.ingredient, quantity, Some(&line.unit), order_id)
                        .await?;
                }
            }
        }

        sqlx::query("DELETE FROM sales WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(order_id, "order reversed");
        Ok(())
    }

    /// Re-run the promotion allocator over an order's persisted lines and
    /// rewrite their promo shares and net totals. No ledger effect.
    pub async fn update_promotion(
        &self,
        order_id: &str,
        input: UpdatePromotionInput,
    ) -> AppResult<Vec<SaleRecord>> {
        let mut tx = self.db.begin().await?;

        let rows = sqlx::query_as::<_, (Uuid, Decimal)>(
            "SELECT id, total FROM sales WHERE order_id = $1 ORDER BY line_no FOR UPDATE",
        )
        .bind(order_id)
        .fetch_all(&mut *tx)
        .await?;

        if rows.is_empty() {
            return Err(AppError::NotFound("Order".to_string()));
        }

        let totals: Vec<Decimal> = rows.iter().map(|r| r.1).collect();
        let gross: Decimal = totals.iter().copied().sum();
        validate_promo_amount(input.promo_amount, gross)?;

        let shares = allocate(&totals, input.promo_amount);
        for ((id, total), share) in rows.iter().zip(&shares) {
            sqlx::query("UPDATE sales SET promo = $2, net_total = $3 WHERE id = $1")
                .bind(id)
                .bind(*share)
                .bind(*total - *share)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        self.get_order(order_id).await
    }

    /// Rewrite an order's id and/or timestamp on all of its rows. A new id
    /// must not collide with another order; the movement journal is renamed
    /// along with the sales so reversal stays exact.
    pub async fn update_order(&self, order_id: &str, input: UpdateOrderInput) -> AppResult<()> {
        let new_order_id = match &input.order_id {
            Some(id) if id.trim().is_empty() => {
                return Err(AppError::Validation {
                    field: "order_id".to_string(),
                    message: "Order id cannot be blank".to_string(),
                });
            }
            Some(id) => Some(id.trim().to_string()),
            None => None,
        };

        let mut tx = self.db.begin().await?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM sales WHERE order_id = $1)",
        )
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;
        if !exists {
            return Err(AppError::NotFound("Order".to_string()));
        }

        if let Some(new_id) = &new_order_id {
            if new_id != order_id {
                // Same lock a commit takes, so a rename cannot race one.
                sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1)::bigint)")
                    .bind(new_id)
                    .execute(&mut *tx)
                    .await?;
                let taken = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM sales WHERE order_id = $1)",
                )
                .bind(new_id)
                .fetch_one(&mut *tx)
                .await?;
                if taken {
                    return Err(AppError::DuplicateEntry("order_id".to_string()));
                }
            }
        }

        sqlx::query(
            r#"
            UPDATE sales
            SET order_id = COALESCE($2, order_id), date = COALESCE($3, date)
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .bind(&new_order_id)
        .bind(input.placed_at)
        .execute(&mut *tx)
        .await?;

        if let Some(new_id) = &new_order_id {
            sqlx::query("UPDATE stock_movements SET order_id = $2 WHERE order_id = $1")
                .bind(order_id)
                .bind(new_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Recent orders in a date range, one summary per order id.
    pub async fn list_orders(&self, range: &DateRange) -> AppResult<Vec<OrderSummary>> {
        let rows = sqlx::query_as::<_, (String, DateTime<Utc>, Decimal, Decimal, Decimal, i64)>(
            r#"
            SELECT order_id, MIN(date), SUM(total), SUM(promo), SUM(net_total), COUNT(*)
            FROM sales
            WHERE date::date BETWEEN $1 AND $2
            GROUP BY order_id
            ORDER BY MIN(date) DESC
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| OrderSummary {
                order_id: r.0,
                date: r.1,
                total: r.2,
                promo: r.3,
                net_total: r.4,
                item_count: r.5,
            })
            .collect())
    }

    /// All line items of one order, in commit order.
    pub async fn get_order(&self, order_id: &str) -> AppResult<Vec<SaleRecord>> {
        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, date, order_id, product, quantity, unit_price, total,
                   promo, net_total, cogs_snapshot, location
            FROM sales
            WHERE order_id = $1
            ORDER BY line_no
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        if rows.is_empty() {
            return Err(AppError::NotFound("Order".to_string()));
        }

        Ok(rows.into_iter().map(SaleRecord::from).collect())
    }
}

/// Put `quantity` of an ingredient back on the ledger. Restore has no
/// ceiling. `quantity_unit` is `None` for journal quantities, which are
/// already in the ledger's unit; recipe-derived quantities carry the line's
/// unit and convert here. An ingredient deleted since the sale is skipped
/// with a warning; there is no row to restore onto.
async fn restore_ingredient(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ingredient: &str,
    quantity: Decimal,
    quantity_unit: Option<&Unit>,
    order_id: &str,
) -> AppResult<()> {
    let ledger_unit = sqlx::query_scalar::<_, String>(
        "SELECT unit FROM ingredients WHERE name = $1 FOR UPDATE",
    )
    .bind(ingredient)
    .fetch_optional(&mut **tx)
    .await?;

    let ledger_unit = match ledger_unit {
        Some(unit) => Unit::parse(&unit),
        None => {
            tracing::warn!(ingredient, order_id, "ingredient no longer on the ledger; restore skipped");
            return Ok(());
        }
    };

    let amount = match quantity_unit {
        None => quantity,
        Some(unit) => match unit.convert(quantity, &ledger_unit) {
            Some(amount) => amount,
            None => {
                tracing::warn!(
                    ingredient,
                    order_id,
                    "recipe unit shares no base unit with the ledger; restore skipped"
                );
                return Ok(());
            }
        },
    };

    sqlx::query(
        "UPDATE ingredients SET quantity = quantity + $2, last_updated = $3 WHERE name = $1",
    )
    .bind(ingredient)
    .bind(amount)
    .bind(Utc::now().date_naive())
    .execute(&mut **tx)
    .await?;

    record_movement(
        tx,
        ingredient,
        MovementDirection::In,
        amount,
        MovementReason::Reversal,
        Some(order_id),
    )
    .await?;

    Ok(())
}

/// Operator-friendly random order id.
fn generate_order_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("ORD-{}", &suffix[..8].to_uppercase())
}
