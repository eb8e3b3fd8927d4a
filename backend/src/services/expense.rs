//! Operational cost entries, independent of any order.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::{validate_expense, DateRange, Expense};

use crate::error::{AppError, AppResult};

/// Operational cost service
#[derive(Clone)]
pub struct ExpenseService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct ExpenseRow {
    id: Uuid,
    date: NaiveDate,
    category: String,
    amount: Decimal,
    note: Option<String>,
}

impl From<ExpenseRow> for Expense {
    fn from(row: ExpenseRow) -> Self {
        Expense {
            id: row.id,
            date: row.date,
            category: row.category,
            amount: row.amount,
            note: row.note,
        }
    }
}

/// Input for recording or updating an operational cost
#[derive(Debug, Deserialize)]
pub struct ExpenseInput {
    pub date: NaiveDate,
    pub category: String,
    pub amount: Decimal,
    pub note: Option<String>,
}

/// Costs of one category summed over a range
#[derive(Debug, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

impl ExpenseService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record an operational cost entry.
    pub async fn create(&self, input: ExpenseInput) -> AppResult<Expense> {
        validate_expense(&input.category, input.amount)?;

        let row = sqlx::query_as::<_, ExpenseRow>(
            r#"
            INSERT INTO expenses (date, category, amount, note)
            VALUES ($1, $2, $3, $4)
            RETURNING id, date, category, amount, note
            "#,
        )
        .bind(input.date)
        .bind(&input.category)
        .bind(input.amount)
        .bind(&input.note)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Replace an entry wholesale.
    pub async fn update(&self, id: Uuid, input: ExpenseInput) -> AppResult<Expense> {
        validate_expense(&input.category, input.amount)?;

        let row = sqlx::query_as::<_, ExpenseRow>(
            r#"
            UPDATE expenses
            SET date = $2, category = $3, amount = $4, note = $5
            WHERE id = $1
            RETURNING id, date, category, amount, note
            "#,
        )
        .bind(id)
        .bind(input.date)
        .bind(&input.category)
        .bind(input.amount)
        .bind(&input.note)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Expense".to_string()))?;

        Ok(row.into())
    }

    /// Delete an entry.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Expense".to_string()));
        }

        Ok(())
    }

    /// Entries in a date range, newest first.
    pub async fn list(&self, range: &DateRange) -> AppResult<Vec<Expense>> {
        let rows = sqlx::query_as::<_, ExpenseRow>(
            r#"
            SELECT id, date, category, amount, note
            FROM expenses
            WHERE date BETWEEN $1 AND $2
            ORDER BY date DESC, category
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Expense::from).collect())
    }

    /// Totals per category over a date range, largest first.
    pub async fn breakdown(&self, range: &DateRange) -> AppResult<Vec<CategoryTotal>> {
        let rows = sqlx::query_as::<_, (String, Decimal)>(
            r#"
            SELECT category, SUM(amount)
            FROM expenses
            WHERE date BETWEEN $1 AND $2
            GROUP BY category
            ORDER BY SUM(amount) DESC
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(category, total)| CategoryTotal { category, total })
            .collect())
    }
}
