//! Payment Models

use serde::{Deserialize, Serialize};

/// Identifier prefix carried by every mock authorization.
pub const MOCK_INTENT_PREFIX: &str = "mock_";

/// The currency every charge is denominated in.
pub const SERVICE_CURRENCY: &str = "usd";

/// A payment intent as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    pub status: String,
}

/// An authorization bridging checkout's two steps.
///
/// Ephemeral: only `intent_id` survives onto the order record. A `mock`
/// authorization is never proof of funds movement; callers must render a
/// distinct confirmation for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAuthorization {
    /// Provider intent id, or a locally generated `mock_…` id.
    pub intent_id: String,

    /// Client secret for the UI to complete the charge; absent in mock mode.
    pub client_secret: Option<String>,

    /// Whether this authorization was synthesized locally.
    pub mock: bool,

    /// Amount in minor currency units.
    pub amount: i64,

    /// Lowercase ISO currency code.
    pub currency: String,
}

impl PaymentAuthorization {
    /// Whether an intent id belongs to a mock authorization.
    #[must_use]
    pub fn is_mock_intent(intent_id: &str) -> bool {
        intent_id.starts_with(MOCK_INTENT_PREFIX)
    }
}
