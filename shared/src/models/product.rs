//! Product catalog models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A sellable product. `cogs` is the recipe-implied ingredient cost cached
/// at the last recipe save; historical sales keep their own snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub cogs: Decimal,
}

impl Product {
    /// Per-unit profit at the current price and cached COGS.
    pub fn profit(&self) -> Decimal {
        self.price - self.cogs
    }

    /// Profit margin as a percentage of price; zero when the price is zero.
    pub fn margin_percent(&self) -> Decimal {
        if self.price.is_zero() {
            Decimal::ZERO
        } else {
            self.profit() / self.price * Decimal::from(100)
        }
    }
}
