//! Recipe (bill-of-materials) resolution and atomic replacement.

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use shared::{RecipeLine, Unit};

use crate::error::AppResult;

/// Recipe service backed by the recipes table
#[derive(Clone)]
pub struct RecipeService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct RecipeRow {
    product: String,
    ingredient: String,
    quantity: Decimal,
    unit: String,
}

impl From<RecipeRow> for RecipeLine {
    fn from(row: RecipeRow) -> Self {
        RecipeLine {
            product: row.product,
            ingredient: row.ingredient,
            quantity: row.quantity,
            unit: Unit::parse(&row.unit),
        }
    }
}

impl RecipeService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// The recipe of a product. A recipe-less product resolves to an empty
    /// vec, never an error: selling it simply consumes nothing.
    pub async fn resolve(&self, product: &str) -> AppResult<Vec<RecipeLine>> {
        let rows = sqlx::query_as::<_, RecipeRow>(
            r#"
            SELECT product, ingredient, quantity, unit
            FROM recipes
            WHERE product = $1
            ORDER BY ingredient
            "#,
        )
        .bind(product)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(RecipeLine::from).collect())
    }
}

/// Resolve a product's recipe inside an open transaction.
pub(crate) async fn resolve_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    product: &str,
) -> AppResult<Vec<RecipeLine>> {
    let rows = sqlx::query_as::<_, RecipeRow>(
        r#"
        SELECT product, ingredient, quantity, unit
        FROM recipes
        WHERE product = $1
        ORDER BY ingredient
        "#,
    )
    .bind(product)
    .fetch_all(&mut **tx)
    .await?;

    Ok(rows.into_iter().map(RecipeLine::from).collect())
}

/// Atomically replace one product's recipe: delete-then-insert within the
/// caller's transaction. Other products' recipes are untouched.
pub(crate) async fn replace_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    product: &str,
    lines: &[RecipeLine],
) -> AppResult<()> {
    sqlx::query("DELETE FROM recipes WHERE product = $1")
        .bind(product)
        .execute(&mut **tx)
        .await?;

    for line in lines {
        sqlx::query(
            r#"
            INSERT INTO recipes (product, ingredient, quantity, unit)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(product)
        .bind(&line.ingredient)
        .bind(line.quantity)
        .bind(line.unit.code())
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

/// Recipe-implied ingredient cost of one product unit, priced at the
/// ledger's current weighted-average costs. Average costs are per ledger
/// unit, so each line's quantity converts to the ingredient's unit before
/// pricing. Ingredients absent from the ledger, or lines whose unit shares
/// no base with the ledger's, contribute zero.
pub(crate) async fn compute_cogs(
    tx: &mut Transaction<'_, Postgres>,
    product: &str,
) -> AppResult<Decimal> {
    let rows = sqlx::query_as::<_, (String, Decimal, String, Option<String>, Option<Decimal>)>(
        r#"
        SELECT r.ingredient, r.quantity, r.unit, i.unit, i.avg_cost
        FROM recipes r
        LEFT JOIN ingredients i ON i.name = r.ingredient
        WHERE r.product = $1
        "#,
    )
    .bind(product)
    .fetch_all(&mut **tx)
    .await?;

    let mut cogs = Decimal::ZERO;
    for (ingredient, quantity, line_unit, ledger_unit, avg_cost) in rows {
        let (ledger_unit, avg_cost) = match (ledger_unit, avg_cost) {
            (Some(unit), Some(cost)) => (unit, cost),
            _ => continue,
        };
        match Unit::parse(&line_unit).convert(quantity, &Unit::parse(&ledger_unit)) {
            Some(converted) => cogs += converted * avg_cost,
            None => {
                tracing::warn!(
                    product,
                    ingredient = %ingredient,
                    "recipe unit shares no base unit with the ledger; line excluded from COGS"
                );
            }
        }
    }

    Ok(cogs)
}
