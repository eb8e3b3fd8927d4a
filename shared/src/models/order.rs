//! Order models: the draft an operator builds up, and the warnings a
//! settlement can produce without failing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Unit;

/// One product entry within a draft order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftLineItem {
    pub product: String,
    pub quantity: Decimal,
    /// Price snapshot taken when the item was added, not a live lookup.
    pub unit_price: Decimal,
    pub total: Decimal,
}

impl DraftLineItem {
    pub fn new(product: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            product: product.into(),
            quantity,
            unit_price,
            total: quantity * unit_price,
        }
    }
}

/// An order being assembled, before it is committed.
///
/// This is an explicit value object passed into the settlement engine; the
/// engine itself holds no order-in-progress state. Draft edits have no
/// ledger effect until commit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DraftOrder {
    /// Operator-supplied order id; a random one is generated at commit when
    /// absent.
    pub order_id: Option<String>,
    pub placed_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub items: Vec<DraftLineItem>,
    pub promo_amount: Decimal,
}

impl DraftOrder {
    pub fn add_item(&mut self, product: impl Into<String>, quantity: Decimal, unit_price: Decimal) {
        self.items.push(DraftLineItem::new(product, quantity, unit_price));
    }

    /// Replace the line item at `index` wholesale. Returns false when the
    /// index is out of range.
    pub fn update_item(
        &mut self,
        index: usize,
        product: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                *item = DraftLineItem::new(product, quantity, unit_price);
                true
            }
            None => false,
        }
    }

    pub fn remove_item(&mut self, index: usize) -> Option<DraftLineItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Sum of line totals before any promotion.
    pub fn gross_total(&self) -> Decimal {
        self.items.iter().map(|i| i.total).sum()
    }
}

/// A soft diagnostic produced while committing an order. These are reported
/// to the caller but never block the sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SettlementWarning {
    /// Consumption exceeded available stock; the ledger was clamped to zero.
    Shortage {
        ingredient: String,
        requested: Decimal,
        applied: Decimal,
        shortage: Decimal,
    },
    /// A recipe referenced an ingredient absent from the ledger; its
    /// consumption was skipped.
    MissingIngredient { product: String, ingredient: String },
    /// A recipe line's unit shares no base unit with the ingredient's
    /// ledger unit; its consumption was skipped.
    UnitMismatch {
        product: String,
        ingredient: String,
        recipe_unit: Unit,
        ledger_unit: Unit,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn test_line_item_total() {
        let item = DraftLineItem::new("Espresso", dec(2), dec(30000));
        assert_eq!(item.total, dec(60000));
    }

    #[test]
    fn test_gross_total_sums_lines() {
        let mut order = DraftOrder::default();
        order.add_item("Espresso", dec(2), dec(30000));
        order.add_item("Latte", dec(1), dec(40000));
        assert_eq!(order.gross_total(), dec(100000));
    }

    #[test]
    fn test_update_item_replaces_wholesale() {
        let mut order = DraftOrder::default();
        order.add_item("Espresso", dec(2), dec(30000));
        assert!(order.update_item(0, "Latte", dec(3), dec(40000)));
        assert_eq!(order.items[0].product, "Latte");
        assert_eq!(order.items[0].total, dec(120000));
    }

    #[test]
    fn test_update_item_out_of_range() {
        let mut order = DraftOrder::default();
        assert!(!order.update_item(0, "Latte", dec(1), dec(40000)));
    }

    #[test]
    fn test_remove_item() {
        let mut order = DraftOrder::default();
        order.add_item("Espresso", dec(1), dec(30000));
        let removed = order.remove_item(0).unwrap();
        assert_eq!(removed.product, "Espresso");
        assert!(order.items.is_empty());
        assert!(order.remove_item(0).is_none());
    }
}
