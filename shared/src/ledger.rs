//! Ledger arithmetic: consumption clamping and weighted-average cost.
//!
//! These are the pure calculations behind the inventory ledger. The backend
//! service applies them inside a database transaction; keeping them here
//! makes the soft-fail semantics testable in isolation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of a consumption against available stock.
///
/// Consumption is best-effort by design: when the request exceeds what is
/// available, the ledger drops to exactly zero and the unmet remainder is
/// reported as `shortage`. Callers surface shortages as warnings but still
/// commit the sale; a stricter caller can treat a non-zero shortage as a
/// hard failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumeResult {
    /// The amount actually deducted from stock.
    pub applied: Decimal,
    /// The requested amount that could not be satisfied.
    pub shortage: Decimal,
}

impl ConsumeResult {
    pub fn is_short(&self) -> bool {
        !self.shortage.is_zero()
    }
}

/// Consume `requested` out of `available`, clamping at zero.
pub fn consume(available: Decimal, requested: Decimal) -> ConsumeResult {
    if requested <= available {
        ConsumeResult {
            applied: requested,
            shortage: Decimal::ZERO,
        }
    } else {
        ConsumeResult {
            applied: available,
            shortage: requested - available,
        }
    }
}

/// Weighted-average unit cost after adding a purchase of `amount` units for
/// `total_cost`.
///
/// `new_avg = (old_qty * old_avg + total_cost) / (old_qty + amount)`; a
/// brand-new ingredient (zero prior quantity) takes the purchase's own unit
/// cost. A zero-amount purchase leaves the average unchanged.
pub fn weighted_average_cost(
    old_quantity: Decimal,
    old_avg_cost: Decimal,
    amount: Decimal,
    total_cost: Decimal,
) -> Decimal {
    let new_quantity = old_quantity + amount;
    if new_quantity.is_zero() {
        return old_avg_cost;
    }
    (old_quantity * old_avg_cost + total_cost) / new_quantity
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_consume_within_stock() {
        let result = consume(dec("50"), dec("40"));
        assert_eq!(result.applied, dec("40"));
        assert_eq!(result.shortage, Decimal::ZERO);
        assert!(!result.is_short());
    }

    #[test]
    fn test_consume_exact_stock() {
        let result = consume(dec("40"), dec("40"));
        assert_eq!(result.applied, dec("40"));
        assert!(!result.is_short());
    }

    #[test]
    fn test_consume_overdraw_clamps_to_zero() {
        // 40 requested against 10 available: ledger goes to 0, shortage 30
        let result = consume(dec("10"), dec("40"));
        assert_eq!(result.applied, dec("10"));
        assert_eq!(result.shortage, dec("30"));
        assert!(result.is_short());
    }

    #[test]
    fn test_consume_from_empty_stock() {
        let result = consume(Decimal::ZERO, dec("5"));
        assert_eq!(result.applied, Decimal::ZERO);
        assert_eq!(result.shortage, dec("5"));
    }

    #[test]
    fn test_weighted_average_new_ingredient() {
        // 100 units bought for 50,000 total => 500 per unit
        let avg = weighted_average_cost(Decimal::ZERO, Decimal::ZERO, dec("100"), dec("50000"));
        assert_eq!(avg, dec("500"));
    }

    #[test]
    fn test_weighted_average_blends_costs() {
        // 100 @ 20 plus 50 bought for 1500 (30/unit) => 3500 / 150
        let avg = weighted_average_cost(dec("100"), dec("20"), dec("50"), dec("1500"));
        assert!(avg > dec("23") && avg < dec("24"));
    }

    #[test]
    fn test_weighted_average_zero_amount_keeps_old() {
        let avg = weighted_average_cost(Decimal::ZERO, dec("12"), Decimal::ZERO, Decimal::ZERO);
        assert_eq!(avg, dec("12"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn quantity_strategy() -> impl Strategy<Value = Decimal> {
            (0i64..=1_000_000i64).prop_map(|n| Decimal::new(n, 2))
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            /// applied + shortage always equals the requested amount
            #[test]
            fn prop_consume_conserves_request(
                available in quantity_strategy(),
                requested in quantity_strategy()
            ) {
                let result = consume(available, requested);
                prop_assert_eq!(result.applied + result.shortage, requested);
            }

            /// the remaining quantity is never negative
            #[test]
            fn prop_consume_never_negative(
                available in quantity_strategy(),
                requested in quantity_strategy()
            ) {
                let result = consume(available, requested);
                prop_assert!(available - result.applied >= Decimal::ZERO);
            }

            /// an overdraw leaves exactly zero behind
            #[test]
            fn prop_overdraw_empties_stock(
                available in quantity_strategy(),
                extra in quantity_strategy()
            ) {
                prop_assume!(!extra.is_zero());
                let result = consume(available, available + extra);
                prop_assert_eq!(available - result.applied, Decimal::ZERO);
                prop_assert_eq!(result.shortage, extra);
            }

            /// the blended average stays between the two input unit costs
            #[test]
            fn prop_weighted_average_bounded(
                old_qty in quantity_strategy(),
                old_avg in quantity_strategy(),
                amount in quantity_strategy(),
                unit_cost in quantity_strategy()
            ) {
                prop_assume!(!old_qty.is_zero() && !amount.is_zero());
                let avg = weighted_average_cost(old_qty, old_avg, amount, amount * unit_cost);
                let lo = old_avg.min(unit_cost);
                let hi = old_avg.max(unit_cost);
                prop_assert!(avg >= lo && avg <= hi);
            }
        }
    }
}
