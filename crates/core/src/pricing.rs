//! Pricing policy
//!
//! A single pure module owns the wholesale discount schedule, so the price a
//! dashboard displays and the price checkout charges can never drift apart.
//! Dealers get a rate from a quantity tier table; every other role pays the
//! catalog price.

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use serde::Serialize;
use thiserror::Error;

use crate::{
    money::{MoneyMathError, percent_of_minor, scale_minor},
    roles::Role,
};

/// Errors that can occur while pricing a line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// The requested quantity was zero.
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(u32),

    /// Wrapped minor-unit arithmetic error.
    #[error(transparent)]
    Math(#[from] MoneyMathError),
}

/// Dealer volume tier.
///
/// Brackets are inclusive on both ends except the last, which is open-ended.
/// An exact boundary quantity lands in the higher tier: ordering 6 units gets
/// the 6–10 rate, not the 1–5 rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DealerTier {
    /// 1–5 units: 10% off.
    UpToFive,

    /// 6–10 units: 15% off.
    SixToTen,

    /// 11–20 units: 20% off.
    ElevenToTwenty,

    /// 21 or more units: 25% off.
    TwentyOnePlus,
}

impl DealerTier {
    /// Select the tier for a requested quantity.
    ///
    /// The quantity is the total requested in this order, not cumulative
    /// purchase history.
    #[must_use]
    pub const fn for_quantity(quantity: u32) -> Self {
        match quantity {
            0..=5 => DealerTier::UpToFive,
            6..=10 => DealerTier::SixToTen,
            11..=20 => DealerTier::ElevenToTwenty,
            _ => DealerTier::TwentyOnePlus,
        }
    }

    /// The discount rate for this tier.
    #[must_use]
    pub fn rate(self) -> Percentage {
        match self {
            DealerTier::UpToFive => Percentage::from(0.10),
            DealerTier::SixToTen => Percentage::from(0.15),
            DealerTier::ElevenToTwenty => Percentage::from(0.20),
            DealerTier::TwentyOnePlus => Percentage::from(0.25),
        }
    }

    /// The quantity bracket as a display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            DealerTier::UpToFive => "1-5",
            DealerTier::SixToTen => "6-10",
            DealerTier::ElevenToTwenty => "11-20",
            DealerTier::TwentyOnePlus => "21+",
        }
    }
}

/// The outcome of pricing one line.
///
/// Always recomputed from the live catalog price, the requested quantity and
/// the buyer's role; never persisted on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingResult {
    base_price: Money<'static, Currency>,
    unit_price: Money<'static, Currency>,
    discount_per_unit: Money<'static, Currency>,
    discount_rate: Percentage,
    tier: Option<DealerTier>,
    quantity: u32,
    subtotal: Money<'static, Currency>,
    total_discount: Money<'static, Currency>,
}

impl PricingResult {
    /// The catalog price before any discount.
    #[must_use]
    pub fn base_price(&self) -> Money<'static, Currency> {
        self.base_price
    }

    /// The per-unit price actually charged.
    #[must_use]
    pub fn unit_price(&self) -> Money<'static, Currency> {
        self.unit_price
    }

    /// The per-unit discount, exact: `base_price - unit_price`.
    #[must_use]
    pub fn discount_per_unit(&self) -> Money<'static, Currency> {
        self.discount_per_unit
    }

    /// The applied discount rate (zero for non-dealers).
    #[must_use]
    pub fn discount_rate(&self) -> Percentage {
        self.discount_rate
    }

    /// The dealer tier this price came from, if any.
    #[must_use]
    pub fn tier(&self) -> Option<DealerTier> {
        self.tier
    }

    /// Tier label for display; `"retail"` when no tier applied.
    #[must_use]
    pub fn tier_label(&self) -> &'static str {
        self.tier.map_or("retail", DealerTier::label)
    }

    /// The quantity this line was priced for.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// `discount_per_unit × quantity`.
    #[must_use]
    pub fn total_discount(&self) -> Money<'static, Currency> {
        self.total_discount
    }

    /// What the buyer saved versus the catalog price; alias of
    /// [`total_discount`](Self::total_discount).
    #[must_use]
    pub fn savings(&self) -> Money<'static, Currency> {
        self.total_discount
    }

    /// Alias of [`subtotal`](Self::subtotal).
    #[must_use]
    pub fn total_price(&self) -> Money<'static, Currency> {
        self.subtotal
    }
}

/// Price a quantity of one bike for a buyer role.
///
/// The per-unit discount is rounded first and then subtracted, so
/// `unit_price + discount_per_unit == base_price` holds exactly and the line
/// totals carry no rounding leak: `subtotal + total_discount` always equals
/// `base_price × quantity`.
///
/// # Errors
///
/// - [`PricingError::InvalidQuantity`]: the quantity was zero.
/// - [`PricingError::Math`]: the amounts overflowed minor-unit arithmetic.
pub fn price_quantity(
    base_price: Money<'static, Currency>,
    quantity: u32,
    role: Role,
) -> Result<PricingResult, PricingError> {
    if quantity == 0 {
        return Err(PricingError::InvalidQuantity(quantity));
    }

    let tier = role.is_dealer().then(|| DealerTier::for_quantity(quantity));
    let rate = tier.map_or_else(|| Percentage::from(0.0), DealerTier::rate);

    let currency = base_price.currency();
    let base_minor = base_price.to_minor_units();

    let discount_minor = percent_of_minor(&rate, base_minor)?;
    let unit_minor = base_minor
        .checked_sub(discount_minor)
        .ok_or(MoneyMathError::AmountOverflow)?;

    Ok(PricingResult {
        base_price,
        unit_price: Money::from_minor(unit_minor, currency),
        discount_per_unit: Money::from_minor(discount_minor, currency),
        discount_rate: rate,
        tier,
        quantity,
        subtotal: Money::from_minor(scale_minor(unit_minor, quantity)?, currency),
        total_discount: Money::from_minor(scale_minor(discount_minor, quantity)?, currency),
    })
}
