//! Financial aggregation over sale records and operational costs.
//!
//! The service only fetches rows; the layered arithmetic lives in
//! `shared::finance`. COGS prefers each sale row's snapshot and falls back
//! to the product's current COGS for legacy rows without one.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use shared::{
    product_profitability, profit_and_loss, DateRange, ProductProfit, ProfitAndLoss, SaleFigures,
};

use crate::error::AppResult;

/// Reporting service over sales and expenses
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct SaleFiguresRow {
    product: String,
    quantity: Decimal,
    unit_price: Decimal,
    total: Decimal,
    net_total: Decimal,
    unit_cogs: Decimal,
}

impl From<SaleFiguresRow> for SaleFigures {
    fn from(row: SaleFiguresRow) -> Self {
        SaleFigures {
            product: row.product,
            quantity: row.quantity,
            unit_price: row.unit_price,
            total: row.total,
            net_total: row.net_total,
            unit_cogs: row.unit_cogs,
        }
    }
}

/// One day of the revenue/profit series
#[derive(Debug, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub gross_revenue: Decimal,
    pub net_revenue: Decimal,
    /// Net revenue minus COGS for the day; operational costs are not
    /// attributed to days.
    pub gross_profit: Decimal,
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Layered profit and loss over an inclusive date range. An empty range
    /// yields all zeros.
    pub async fn profit_and_loss(&self, range: &DateRange) -> AppResult<ProfitAndLoss> {
        let sales = self.sale_figures(range).await?;

        let operating_costs = sqlx::query_scalar::<_, Option<Decimal>>(
            "SELECT SUM(amount) FROM expenses WHERE date BETWEEN $1 AND $2",
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.db)
        .await?
        .unwrap_or(Decimal::ZERO);

        Ok(profit_and_loss(&sales, operating_costs))
    }

    /// Per-product profit over a range, most profitable first.
    pub async fn product_profitability(&self, range: &DateRange) -> AppResult<Vec<ProductProfit>> {
        let sales = self.sale_figures(range).await?;
        Ok(product_profitability(&sales))
    }

    /// Daily revenue and gross profit series over a range.
    pub async fn daily_series(&self, range: &DateRange) -> AppResult<Vec<DailyPoint>> {
        let rows = sqlx::query_as::<_, (NaiveDate, Decimal, Decimal, Decimal)>(
            r#"
            SELECT s.date::date AS day,
                   SUM(s.total),
                   SUM(s.net_total),
                   SUM(s.net_total) - SUM(s.quantity * COALESCE(s.cogs_snapshot, p.cogs, 0))
            FROM sales s
            LEFT JOIN products p ON p.name = s.product
            WHERE s.date::date BETWEEN $1 AND $2
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(date, gross, net, profit)| DailyPoint {
                date,
                gross_revenue: gross,
                net_revenue: net,
                gross_profit: profit,
            })
            .collect())
    }

    async fn sale_figures(&self, range: &DateRange) -> AppResult<Vec<SaleFigures>> {
        let rows = sqlx::query_as::<_, SaleFiguresRow>(
            r#"
            SELECT s.product, s.quantity, s.unit_price, s.total, s.net_total,
                   COALESCE(s.cogs_snapshot, p.cogs, 0) AS unit_cogs
            FROM sales s
            LEFT JOIN products p ON p.name = s.product
            WHERE s.date::date BETWEEN $1 AND $2
            ORDER BY s.date, s.line_no
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(SaleFigures::from).collect())
    }
}
