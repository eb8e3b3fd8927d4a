//! Proportional allocation of an order-level promotion across line items.

use rust_decimal::Decimal;

/// Distribute `promo_amount` across line items proportionally to each line's
/// share of the order's gross total.
///
/// The allocator is pure and stateless: it is re-invoked on the full current
/// set of lines whenever the promo amount, the line set, or any quantity
/// changes; shares are recomputed, never diffed. A zero gross total yields
/// a zero share for every line.
pub fn allocate(line_totals: &[Decimal], promo_amount: Decimal) -> Vec<Decimal> {
    let gross: Decimal = line_totals.iter().copied().sum();
    if gross.is_zero() {
        return vec![Decimal::ZERO; line_totals.len()];
    }
    line_totals
        .iter()
        .map(|total| promo_amount * *total / gross)
        .collect()
}

/// Net total of a line after its allocated share.
pub fn net_total(line_total: Decimal, allocated_share: Decimal) -> Decimal {
    line_total - allocated_share
}
