//! Quote Models

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use crate::{domain::catalog::models::BikeUuid, uuids::TypedUuid};

/// Quote UUID
pub type QuoteUuid = TypedUuid<Quote>;

/// How long a quote remains actionable after creation. Fixed for every
/// quote; not configurable per record.
pub const QUOTE_VALIDITY: SignedDuration = SignedDuration::from_hours(30 * 24);

/// Who a quote is prepared for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealerInfo {
    pub name: String,
    pub email: String,
}

/// One quoted line, snapshotted at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteLine {
    pub bike: BikeUuid,
    pub name: String,
    pub quantity: u32,

    /// Catalog price when the quote was cut.
    pub base_price: i64,

    /// Dealer unit price under the volume tier for `quantity`.
    pub unit_price: i64,

    /// `unit_price × quantity`.
    pub line_total: i64,
}

/// Quote Model
///
/// Created once and read-only thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub uuid: QuoteUuid,
    pub quote_number: String,
    pub dealer: DealerInfo,
    pub lines: Vec<QuoteLine>,
    pub subtotal: i64,
    pub tax: i64,
    pub total: i64,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

impl Quote {
    /// Whether the validity window has passed. Advisory: expired quotes stay
    /// readable for audit, the caller decides actionability.
    #[must_use]
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }
}
