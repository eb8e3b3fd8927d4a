//! Layered profit and loss math over sale and cost figures.
//!
//! The backend's reporting service fetches the rows; the computation lives
//! here so the layering (gross revenue -> net revenue -> gross profit ->
//! net profit) is testable without a database. Operating profit and net
//! profit are the same figure in this system; no tax or financing layer is
//! modeled.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The figures of one sale line that feed the aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleFigures {
    pub product: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total: Decimal,
    /// Net of the allocated promotion; equal to `total` when no promotion
    /// applied (legacy rows without a promo resolve to that at load time).
    pub net_total: Decimal,
    /// COGS per unit for this line (snapshot at sale time, or the current
    /// product COGS as a fallback; zero when the product is unknown).
    pub unit_cogs: Decimal,
}

/// The layered profit and loss summary over a date window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitAndLoss {
    pub gross_revenue: Decimal,
    pub net_revenue: Decimal,
    pub cogs: Decimal,
    pub gross_profit: Decimal,
    pub operating_costs: Decimal,
    pub net_profit: Decimal,
    /// Net profit over net revenue, as a percentage; zero when net revenue
    /// is zero.
    pub net_margin_percent: Decimal,
}

/// Profitability of one product over the window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductProfit {
    pub product: String,
    pub revenue: Decimal,
    pub units_sold: Decimal,
    pub profit: Decimal,
    /// Profit over revenue, as a percentage; zero when revenue is zero.
    pub margin_percent: Decimal,
}

/// Compute the layered summary from sale figures and the operating costs of
/// the same window. An empty window yields all zeros, never an error.
pub fn profit_and_loss(sales: &[SaleFigures], operating_costs: Decimal) -> ProfitAndLoss {
    let gross_revenue: Decimal = sales.iter().map(|s| s.total).sum();
    let net_revenue: Decimal = sales.iter().map(|s| s.net_total).sum();
    let cogs: Decimal = sales.iter().map(|s| s.quantity * s.unit_cogs).sum();
    let gross_profit = net_revenue - cogs;
    let net_profit = gross_profit - operating_costs;
    let net_margin_percent = ratio_percent(net_profit, net_revenue);

    ProfitAndLoss {
        gross_revenue,
        net_revenue,
        cogs,
        gross_profit,
        operating_costs,
        net_profit,
        net_margin_percent,
    }
}

/// Per-product profit `(unit_price - unit_cogs) * quantity`, grouped by
/// product in first-encountered order and sorted by profit descending. The
/// sort is stable, so ties keep their encounter order and the head of the
/// returned list is the most profitable product.
pub fn product_profitability(sales: &[SaleFigures]) -> Vec<ProductProfit> {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: std::collections::HashMap<String, ProductProfit> =
        std::collections::HashMap::new();

    for sale in sales {
        let entry = grouped
            .entry(sale.product.clone())
            .or_insert_with(|| {
                order.push(sale.product.clone());
                ProductProfit {
                    product: sale.product.clone(),
                    revenue: Decimal::ZERO,
                    units_sold: Decimal::ZERO,
                    profit: Decimal::ZERO,
                    margin_percent: Decimal::ZERO,
                }
            });
        entry.revenue += sale.total;
        entry.units_sold += sale.quantity;
        entry.profit += (sale.unit_price - sale.unit_cogs) * sale.quantity;
    }

    let mut result: Vec<ProductProfit> = order
        .into_iter()
        .filter_map(|name| grouped.remove(&name))
        .map(|mut p| {
            p.margin_percent = ratio_percent(p.profit, p.revenue);
            p
        })
        .collect();
    result.sort_by(|a, b| b.profit.cmp(&a.profit));
    result
}

/// `numerator / denominator * 100`, yielding zero instead of an error or NaN
/// when the denominator is zero.
pub fn ratio_percent(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator * Decimal::from(100)
    }
}
