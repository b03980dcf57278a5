//! Promo Models

use sprocket::promos::PromoKind;

/// New Promo Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewPromo {
    pub code: String,
    pub kind: PromoKind,
    pub description: String,
}
