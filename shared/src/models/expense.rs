//! Operational cost models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An operational cost entry, independent of any order. Summed over a date
/// range during financial aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub date: NaiveDate,
    pub category: String,
    pub amount: Decimal,
    pub note: Option<String>,
}
