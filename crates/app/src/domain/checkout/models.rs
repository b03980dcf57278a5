//! Checkout Models

use serde::{Deserialize, Serialize};

use crate::domain::{
    catalog::models::BikeUuid,
    orders::models::{OrderLine, TotalsSnapshot},
    payments::models::PaymentAuthorization,
};

/// One cart line after pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    pub bike: BikeUuid,
    pub name: String,
    pub quantity: u32,

    /// Catalog price at pricing time.
    pub base_price: i64,

    /// Unit price after any dealer tier discount.
    pub unit_price: i64,

    /// `unit_price × quantity`.
    pub line_subtotal: i64,
}

impl From<PricedLine> for OrderLine {
    fn from(line: PricedLine) -> Self {
        Self {
            bike: line.bike,
            name: line.name,
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_subtotal: line.line_subtotal,
        }
    }
}

/// The outcome of checkout step one: priced lines, the computed money
/// breakdown, and a payment authorization to complete against.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutIntent {
    pub lines: Vec<PricedLine>,
    pub totals: TotalsSnapshot,
    pub promo_code: Option<String>,
    pub authorization: PaymentAuthorization,
}
