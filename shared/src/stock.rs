//! Unit-aware low-stock evaluation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Unit, UnitClass};

/// Category-level replenishment thresholds, expressed in base units.
/// Thresholds apply per unit class, not per ingredient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockThresholds {
    /// Threshold for piece-counted items.
    pub pieces: Decimal,
    /// Threshold for liquids, in base milliliters.
    pub volume_ml: Decimal,
    /// Threshold for solids, in base grams.
    pub mass_g: Decimal,
}

impl Default for StockThresholds {
    fn default() -> Self {
        Self {
            pieces: Decimal::from(10),
            volume_ml: Decimal::from(300),
            mass_g: Decimal::from(100),
        }
    }
}

impl StockThresholds {
    /// The threshold for a unit class, in that class's base unit.
    pub fn for_class(&self, class: UnitClass) -> Decimal {
        match class {
            UnitClass::Mass => self.mass_g,
            UnitClass::Volume => self.volume_ml,
            UnitClass::Count => self.pieces,
        }
    }
}

/// Whether a quantity in the given unit is at or below its category
/// threshold. Returns `None` for unrecognized units, which are incomparable;
/// the caller logs the anomaly and skips the check instead of failing.
pub fn is_low_stock(quantity: Decimal, unit: &Unit, thresholds: &StockThresholds) -> Option<bool> {
    let class = unit.class()?;
    let (base_quantity, _) = unit.normalize(quantity);
    Some(base_quantity <= thresholds.for_class(class))
}
