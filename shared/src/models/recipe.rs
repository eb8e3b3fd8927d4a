//! Recipe (bill-of-materials) models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Unit;

/// One line of a product's recipe: the quantity of an ingredient consumed
/// per single unit of the product sold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeLine {
    pub product: String,
    pub ingredient: String,
    pub quantity: Decimal,
    pub unit: Unit,
}

impl RecipeLine {
    /// Total ingredient quantity consumed by selling `sold_quantity` units.
    pub fn consumption_for(&self, sold_quantity: Decimal) -> Decimal {
        self.quantity * sold_quantity
    }
}
