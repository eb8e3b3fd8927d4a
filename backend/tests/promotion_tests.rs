//! Promotion allocation tests
//!
//! The allocator splits an order-level promotion across line items in
//! proportion to each line's share of the gross total, and is re-run in full
//! whenever a promotion is edited after commit.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::{allocate, net_total, validate_promo_amount};

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

    /// 10,000 over lines of 60,000 and 40,000 splits 6,000 / 4,000
    #[test]
    fn test_worked_allocation_example() {
        let shares = allocate(&[dec("60000"), dec("40000")], dec("10000"));
        assert_eq!(shares, vec![dec("6000"), dec("4000")]);
        assert_eq!(net_total(dec("60000"), shares[0]), dec("54000"));
        assert_eq!(net_total(dec("40000"), shares[1]), dec("36000"));
    }

    /// A zero gross total allocates nothing rather than dividing by zero
    #[test]
    fn test_zero_gross_total() {
        let shares = allocate(&[Decimal::ZERO, Decimal::ZERO], dec("5000"));
        assert!(shares.iter().all(|s| s.is_zero()));
    }

    /// Editing the promotion re-runs the allocator over the same line set;
    /// the shares depend only on (lines, promo), not on previous shares
    #[test]
    fn test_promo_edit_recomputes_from_scratch() {
        let totals = [dec("60000"), dec("40000")];

        let first = allocate(&totals, dec("10000"));
        let edited = allocate(&totals, dec("20000"));
        let reverted = allocate(&totals, dec("10000"));

        assert_eq!(edited, vec![dec("12000"), dec("8000")]);
        assert_eq!(first, reverted);
    }

    /// Promo equal to the gross total is allowed (a free order)
    #[test]
    fn test_promo_may_equal_gross() {
        assert!(validate_promo_amount(dec("100000"), dec("100000")).is_ok());
        let shares = allocate(&[dec("60000"), dec("40000")], dec("100000"));
        assert_eq!(shares, vec![dec("60000"), dec("40000")]);
    }

    /// Promo above the gross total is a hard validation error
    #[test]
    fn test_promo_above_gross_rejected() {
        assert!(validate_promo_amount(dec("100001"), dec("100000")).is_err());
    }

    /// Negative promo is a hard validation error
    #[test]
    fn test_negative_promo_rejected() {
        assert!(validate_promo_amount(dec("-1"), dec("100000")).is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating line totals
    fn lines_strategy() -> impl Strategy<Value = Vec<Decimal>> {
        prop::collection::vec((1i64..=10_000_000i64).prop_map(Decimal::from), 1..12)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The shares sum back to the promo within one currency unit per
        /// line of rounding slack
        #[test]
        fn prop_allocation_conserves_promo(
            lines in lines_strategy(),
            promo in 0i64..=1_000_000i64
        ) {
            let promo = Decimal::from(promo);
            let shares = allocate(&lines, promo);
            let total: Decimal = shares.iter().copied().sum();
            let epsilon = Decimal::from(lines.len() as i64);
            prop_assert!((total - promo).abs() <= epsilon);
        }

        /// Net totals never exceed line totals and never go negative when
        /// the promo is within the gross total
        #[test]
        fn prop_net_totals_bounded(lines in lines_strategy()) {
            let gross: Decimal = lines.iter().copied().sum();
            let promo = gross / Decimal::from(2);
            let shares = allocate(&lines, promo);
            for (total, share) in lines.iter().zip(&shares) {
                let net = net_total(*total, *share);
                prop_assert!(net >= Decimal::ZERO);
                prop_assert!(net <= *total);
            }
        }

        /// Allocation scales linearly with the promo amount, up to the
        /// rounding slack of the division
        #[test]
        fn prop_allocation_scales_with_promo(
            lines in lines_strategy(),
            promo in 1i64..=500_000i64
        ) {
            let promo = Decimal::from(promo);
            let single = allocate(&lines, promo);
            let doubled = allocate(&lines, promo * Decimal::from(2));
            let epsilon = Decimal::new(1, 10);
            for (s, d) in single.iter().zip(&doubled) {
                prop_assert!((*s * Decimal::from(2) - *d).abs() <= epsilon);
            }
        }
    }
}
