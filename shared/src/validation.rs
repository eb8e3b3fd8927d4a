//! Validation for engine inputs.
//!
//! These are the hard, local checks: they reject bad input before any state
//! is mutated. Soft conditions (shortages, missing ingredients) are not
//! validations; they surface as warnings on a successful settlement.

use rust_decimal::Decimal;

use crate::models::DraftOrder;
use crate::types::Unit;

/// Validate a draft order before commit.
pub fn validate_draft_order(order: &DraftOrder) -> Result<(), &'static str> {
    if order.items.is_empty() {
        return Err("Order has no line items");
    }
    for item in &order.items {
        if item.product.trim().is_empty() {
            return Err("Line item product name is empty");
        }
        if item.quantity <= Decimal::ZERO {
            return Err("Line item quantity must be positive");
        }
        if item.unit_price < Decimal::ZERO {
            return Err("Line item unit price cannot be negative");
        }
    }
    if let Some(id) = &order.order_id {
        if id.trim().is_empty() {
            return Err("Order id cannot be blank");
        }
    }
    validate_promo_amount(order.promo_amount, order.gross_total())
}

/// A promotion must be non-negative and no larger than the order's gross
/// total.
pub fn validate_promo_amount(promo: Decimal, gross_total: Decimal) -> Result<(), &'static str> {
    if promo < Decimal::ZERO {
        return Err("Promotion amount cannot be negative");
    }
    if promo > gross_total {
        return Err("Promotion amount exceeds order total");
    }
    Ok(())
}

/// Validate an ingredient purchase before it hits the ledger.
pub fn validate_purchase(
    name: &str,
    amount: Decimal,
    total_cost: Decimal,
) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Ingredient name is empty");
    }
    if amount <= Decimal::ZERO {
        return Err("Purchase amount must be positive");
    }
    if total_cost < Decimal::ZERO {
        return Err("Purchase cost cannot be negative");
    }
    Ok(())
}

/// Validate an operational cost entry.
pub fn validate_expense(category: &str, amount: Decimal) -> Result<(), &'static str> {
    if category.trim().is_empty() {
        return Err("Expense category is empty");
    }
    if amount <= Decimal::ZERO {
        return Err("Expense amount must be positive");
    }
    Ok(())
}

/// Validate a recipe line before it is saved.
pub fn validate_recipe_line(ingredient: &str, quantity: Decimal) -> Result<(), &'static str> {
    if ingredient.trim().is_empty() {
        return Err("Recipe ingredient name is empty");
    }
    if quantity <= Decimal::ZERO {
        return Err("Recipe quantity must be positive");
    }
    Ok(())
}

/// A recipe line's unit must share a base unit with the ingredient's ledger
/// unit (kg against g is fine, ml against g is not), or the consumption it
/// implies has no meaning.
pub fn validate_unit_compatibility(
    recipe_unit: &Unit,
    ledger_unit: &Unit,
) -> Result<(), &'static str> {
    if recipe_unit.is_compatible_with(ledger_unit) {
        Ok(())
    } else {
        Err("Recipe unit is incompatible with the ingredient's ledger unit")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn valid_order() -> DraftOrder {
        let mut order = DraftOrder::default();
        order.add_item("Espresso", dec("2"), dec("30000"));
        order
    }

    #[test]
    fn test_valid_order_passes() {
        assert!(validate_draft_order(&valid_order()).is_ok());
    }

    #[test]
    fn test_empty_order_rejected() {
        assert!(validate_draft_order(&DraftOrder::default()).is_err());
    }

    #[test]
    fn test_empty_product_name_rejected() {
        let mut order = DraftOrder::default();
        order.add_item("  ", dec("1"), dec("30000"));
        assert!(validate_draft_order(&order).is_err());
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let mut order = DraftOrder::default();
        order.add_item("Espresso", Decimal::ZERO, dec("30000"));
        assert!(validate_draft_order(&order).is_err());

        let mut order = DraftOrder::default();
        order.add_item("Espresso", dec("-1"), dec("30000"));
        assert!(validate_draft_order(&order).is_err());
    }

    #[test]
    fn test_blank_order_id_rejected() {
        let mut order = valid_order();
        order.order_id = Some("  ".to_string());
        assert!(validate_draft_order(&order).is_err());
    }

    #[test]
    fn test_promo_exceeding_total_rejected() {
        let mut order = valid_order();
        order.promo_amount = dec("60001");
        assert!(validate_draft_order(&order).is_err());
    }

    #[test]
    fn test_promo_equal_to_total_allowed() {
        let mut order = valid_order();
        order.promo_amount = dec("60000");
        assert!(validate_draft_order(&order).is_ok());
    }

    #[test]
    fn test_negative_promo_rejected() {
        assert!(validate_promo_amount(dec("-1"), dec("100")).is_err());
    }

    #[test]
    fn test_purchase_validation() {
        assert!(validate_purchase("Coffee Beans", dec("100"), dec("50000")).is_ok());
        assert!(validate_purchase("", dec("100"), dec("50000")).is_err());
        assert!(validate_purchase("Coffee Beans", Decimal::ZERO, dec("50000")).is_err());
        assert!(validate_purchase("Coffee Beans", dec("100"), dec("-1")).is_err());
    }

    #[test]
    fn test_expense_validation() {
        assert!(validate_expense("Rent", dec("2000000")).is_ok());
        assert!(validate_expense("", dec("2000000")).is_err());
        assert!(validate_expense("Rent", Decimal::ZERO).is_err());
    }

    #[test]
    fn test_recipe_line_validation() {
        assert!(validate_recipe_line("Coffee Beans", dec("20")).is_ok());
        assert!(validate_recipe_line("", dec("20")).is_err());
        assert!(validate_recipe_line("Coffee Beans", Decimal::ZERO).is_err());
    }

    #[test]
    fn test_unit_compatibility_validation() {
        assert!(validate_unit_compatibility(&Unit::Kilogram, &Unit::Gram).is_ok());
        assert!(validate_unit_compatibility(&Unit::Liter, &Unit::Milliliter).is_ok());
        assert!(validate_unit_compatibility(&Unit::Gram, &Unit::Gram).is_ok());
        assert!(validate_unit_compatibility(&Unit::Milliliter, &Unit::Gram).is_err());
        assert!(validate_unit_compatibility(&Unit::Piece, &Unit::Gram).is_err());
    }
}
