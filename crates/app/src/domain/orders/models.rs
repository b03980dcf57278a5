//! Order Models

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use sprocket::{status::OrderStatus, totals::CheckoutTotals};

use crate::{domain::catalog::models::BikeUuid, uuids::TypedUuid};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// How long after commit an order is estimated to arrive.
pub const DELIVERY_ESTIMATE: SignedDuration = SignedDuration::from_hours(7 * 24);

/// The payment method recorded on orders; the storefront only charges cards
/// through the Stripe-shaped gateway (mock authorizations included).
pub const PAYMENT_METHOD: &str = "stripe";

/// A shipping destination, validated before checkout reaches any side effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub name: String,
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// One order line, snapshotted at commit time.
///
/// `name` and `unit_price` are copies, deliberately denormalized: later
/// catalog edits must not rewrite order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub bike: BikeUuid,
    pub name: String,
    pub quantity: u32,
    pub unit_price: i64,
    pub line_subtotal: i64,
}

/// Minor-unit totals as stored on order records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalsSnapshot {
    pub subtotal: i64,
    pub discount: i64,
    pub tax: i64,
    pub shipping: i64,
    pub total: i64,
}

impl From<CheckoutTotals> for TotalsSnapshot {
    fn from(totals: CheckoutTotals) -> Self {
        Self {
            subtotal: totals.subtotal().to_minor_units(),
            discount: totals.discount().to_minor_units(),
            tax: totals.tax().to_minor_units(),
            shipping: totals.shipping().to_minor_units(),
            total: totals.total().to_minor_units(),
        }
    }
}

/// Order Model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub uuid: OrderUuid,
    pub order_number: String,
    pub user_email: String,
    pub lines: Vec<OrderLine>,
    pub totals: TotalsSnapshot,
    pub promo_code: Option<String>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub payment_intent_id: String,
    pub status: OrderStatus,
    pub estimated_delivery: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Order Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_email: String,
    pub lines: Vec<OrderLine>,
    pub totals: TotalsSnapshot,
    pub promo_code: Option<String>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub payment_intent_id: String,
}
