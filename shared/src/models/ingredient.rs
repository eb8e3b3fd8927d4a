//! Inventory ledger models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Unit;

/// A ledger entry for one ingredient.
///
/// The name is the unique key; quantity never goes negative through a
/// consumption (a consume that would overdraw clamps to zero and reports a
/// shortage instead). `avg_cost` is the weighted-average unit cost across
/// purchases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: Decimal,
    pub unit: Unit,
    pub avg_cost: Decimal,
    pub last_updated: NaiveDate,
}

impl Ingredient {
    /// Current ledger value of this ingredient (quantity x average cost).
    pub fn stock_value(&self) -> Decimal {
        self.quantity * self.avg_cost
    }
}

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    In,
    Out,
}

impl MovementDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementDirection::In => "in",
            MovementDirection::Out => "out",
        }
    }
}

/// Why a stock movement happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementReason {
    Purchase,
    Sale,
    Reversal,
    Adjustment,
}

impl MovementReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementReason::Purchase => "purchase",
            MovementReason::Sale => "sale",
            MovementReason::Reversal => "reversal",
            MovementReason::Adjustment => "adjustment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "purchase" => Some(MovementReason::Purchase),
            "sale" => Some(MovementReason::Sale),
            "reversal" => Some(MovementReason::Reversal),
            "adjustment" => Some(MovementReason::Adjustment),
            _ => None,
        }
    }
}

/// One immutable row in the stock movement journal. Sale consumptions carry
/// the order id so a deleted order can be reversed by exactly what it
/// consumed, not by whatever the recipe says today.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: uuid::Uuid,
    pub ingredient: String,
    pub direction: MovementDirection,
    pub quantity: Decimal,
    pub reason: MovementReason,
    pub order_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
