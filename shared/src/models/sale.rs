//! Persisted sale (line item) records

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One persisted line item of a committed order. An order is materialized as
/// the flat set of sale records sharing an `order_id`; there is no separate
/// parent record. The location, when present, is carried on the first record
/// of the order only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub order_id: String,
    pub product: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total: Decimal,
    /// This line's proportional share of the order-level promotion.
    pub promo: Decimal,
    pub net_total: Decimal,
    /// Product COGS per unit captured at commit time.
    pub cogs_snapshot: Option<Decimal>,
    pub location: Option<String>,
}

/// An order as seen in listings: its line items rolled up by order id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    pub order_id: String,
    pub date: DateTime<Utc>,
    pub total: Decimal,
    pub promo: Decimal,
    pub net_total: Decimal,
    pub item_count: i64,
}
