//! Inventory ledger tests
//!
//! Weighted-average purchase costing, clamped consumption, stock valuation,
//! and unit-aware low-stock evaluation.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::{
    consume, is_low_stock, weighted_average_cost, Ingredient, StockThresholds, Unit,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;
    use chrono::NaiveDate;

    /// First purchase of a new ingredient sets avg cost to its unit cost
    #[test]
    fn test_first_purchase_sets_unit_cost() {
        // 100 units for 50,000 total
        let avg = weighted_average_cost(Decimal::ZERO, Decimal::ZERO, dec("100"), dec("50000"));
        assert_eq!(avg, dec("500"));
    }

    /// A later purchase blends into the weighted average
    #[test]
    fn test_purchase_blends_average() {
        // 100 @ 20 on hand, buy 50 for 1500 (30/unit): 3500 / 150 = 23.33...
        let avg = weighted_average_cost(dec("100"), dec("20"), dec("50"), dec("1500"));
        assert!(avg > dec("23.3") && avg < dec("23.4"));
    }

    /// Consumption clamps at zero and reports the unmet remainder
    #[test]
    fn test_consume_clamps_at_zero() {
        let result = consume(dec("10"), dec("40"));
        assert_eq!(result.applied, dec("10"));
        assert_eq!(result.shortage, dec("30"));
    }

    /// Stock value is quantity times average cost
    #[test]
    fn test_stock_value() {
        let ingredient = Ingredient {
            name: "Coffee Beans".to_string(),
            quantity: dec("500"),
            unit: Unit::Gram,
            avg_cost: dec("0.3"),
            last_updated: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
        };
        assert_eq!(ingredient.stock_value(), dec("150"));
    }

    /// Mass thresholds compare in grams after normalization
    #[test]
    fn test_low_stock_mass_normalized() {
        let thresholds = StockThresholds::default();
        // 0.08 kg = 80 g, at or below the 100 g default
        assert_eq!(is_low_stock(dec("0.08"), &Unit::Kilogram, &thresholds), Some(true));
        assert_eq!(is_low_stock(dec("0.5"), &Unit::Kilogram, &thresholds), Some(false));
    }

    /// Volume thresholds compare in milliliters after normalization
    #[test]
    fn test_low_stock_volume_normalized() {
        let thresholds = StockThresholds::default();
        assert_eq!(is_low_stock(dec("0.25"), &Unit::Liter, &thresholds), Some(true));
        assert_eq!(is_low_stock(dec("2"), &Unit::Liter, &thresholds), Some(false));
    }

    /// Piece-counted items use the piece threshold directly
    #[test]
    fn test_low_stock_pieces() {
        let thresholds = StockThresholds::default();
        assert_eq!(is_low_stock(dec("10"), &Unit::Piece, &thresholds), Some(true));
        assert_eq!(is_low_stock(dec("11"), &Unit::Piece, &thresholds), Some(false));
    }

    /// Unrecognized units are incomparable: no verdict, caller skips
    #[test]
    fn test_low_stock_unknown_unit_skipped() {
        let thresholds = StockThresholds::default();
        let unit = Unit::Other("bag".to_string());
        assert_eq!(is_low_stock(dec("1"), &unit, &thresholds), None);
    }

    /// Unknown unit strings parse to Other, never an error
    #[test]
    fn test_unknown_unit_parses_to_other() {
        assert_eq!(Unit::parse("dozen"), Unit::Other("dozen".to_string()));
        assert_eq!(Unit::parse("kg"), Unit::Kilogram);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating quantities with two decimal places
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Purchases never lower the ledger quantity and never produce a
        /// negative average cost
        #[test]
        fn prop_purchase_grows_stock(
            old_qty in quantity_strategy(),
            old_avg in quantity_strategy(),
            amount in (1i64..=100_000i64).prop_map(|n| Decimal::new(n, 2)),
            total_cost in quantity_strategy()
        ) {
            let new_qty = old_qty + amount;
            let avg = weighted_average_cost(old_qty, old_avg, amount, total_cost);
            prop_assert!(new_qty >= old_qty);
            prop_assert!(avg >= Decimal::ZERO);
        }

        /// The blended average equals total value over total quantity
        #[test]
        fn prop_average_is_value_over_quantity(
            old_qty in (1i64..=100_000i64).prop_map(|n| Decimal::new(n, 2)),
            old_avg in quantity_strategy(),
            amount in (1i64..=100_000i64).prop_map(|n| Decimal::new(n, 2)),
            total_cost in quantity_strategy()
        ) {
            let avg = weighted_average_cost(old_qty, old_avg, amount, total_cost);
            let expected = (old_qty * old_avg + total_cost) / (old_qty + amount);
            prop_assert_eq!(avg, expected);
        }

        /// Normalization preserves the low-stock verdict: a quantity in kg
        /// and the same quantity pre-converted to g agree
        #[test]
        fn prop_normalization_consistent(
            kg in (1i64..=10_000i64).prop_map(|n| Decimal::new(n, 3))
        ) {
            let thresholds = StockThresholds::default();
            let in_kg = is_low_stock(kg, &Unit::Kilogram, &thresholds);
            let in_g = is_low_stock(kg * Decimal::from(1000), &Unit::Gram, &thresholds);
            prop_assert_eq!(in_kg, in_g);
        }
    }
}
