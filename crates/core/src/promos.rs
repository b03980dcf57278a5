//! Promo codes
//!
//! A promo is a read-only record at checkout time: the flow looks one up,
//! applies it to the subtotal, and never mutates it. Creation and editing are
//! an admin concern that lives with the storage layer.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::money::{MoneyMathError, percent_of_minor};

/// Errors from promo lookup and application.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromoError {
    /// No promo exists with this code.
    #[error("promo code {0:?} not found")]
    NotFound(String),

    /// The promo exists but has been deactivated.
    #[error("promo code {0:?} is no longer active")]
    Inactive(String),

    /// Wrapped minor-unit arithmetic error.
    #[error(transparent)]
    Math(#[from] MoneyMathError),
}

/// How a promo discounts a subtotal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PromoKind {
    /// A fractional rate off the subtotal.
    Percentage(Percentage),

    /// A fixed amount off, capped at the subtotal.
    Fixed(Money<'static, Currency>),
}

impl PromoKind {
    /// A percentage promo from whole percent points (e.g. `10` for 10% off).
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "promo rates are whole percent points, well inside exact f64 range"
    )]
    pub fn percent_points(points: i64) -> Self {
        PromoKind::Percentage(Percentage::from(points as f64 / 100.0))
    }

    /// Reassemble a kind from its stored projection.
    ///
    /// `kind` is one of `"percentage"` (magnitude in percent points) or
    /// `"fixed"` (magnitude in minor units of `currency`). Anything else
    /// returns `None`.
    #[must_use]
    pub fn from_parts(kind: &str, magnitude: i64, currency: &'static Currency) -> Option<Self> {
        match kind {
            "percentage" => Some(Self::percent_points(magnitude)),
            "fixed" => Some(PromoKind::Fixed(Money::from_minor(magnitude, currency))),
            _ => None,
        }
    }

    /// Stable name of this kind.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            PromoKind::Percentage(_) => "percentage",
            PromoKind::Fixed(_) => "fixed",
        }
    }

    /// The stored projection of this kind's magnitude: percent points for
    /// percentage promos, minor units for fixed promos.
    ///
    /// Returns `None` for a percentage that does not round to whole points.
    #[must_use]
    pub fn magnitude(&self) -> Option<i64> {
        match self {
            PromoKind::Percentage(rate) => {
                let points = ((*rate) * Decimal::ONE).checked_mul(Decimal::ONE_HUNDRED)?;

                if points.fract().is_zero() {
                    points.to_i64()
                } else {
                    None
                }
            }
            PromoKind::Fixed(amount) => Some(amount.to_minor_units()),
        }
    }
}

/// A promo code record.
#[derive(Debug, Clone, PartialEq)]
pub struct Promo {
    code: String,
    kind: PromoKind,
    description: String,
    active: bool,
}

impl Promo {
    /// Create a promo. Codes are matched case-insensitively; the stored form
    /// is normalised to lowercase here so every lookup path agrees.
    #[must_use]
    pub fn new(code: &str, kind: PromoKind, description: &str, active: bool) -> Self {
        Self {
            code: code.to_lowercase(),
            kind,
            description: description.to_string(),
            active,
        }
    }

    /// The normalised (lowercase) code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// How this promo discounts.
    #[must_use]
    pub fn kind(&self) -> PromoKind {
        self.kind
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the promo can currently be applied.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The discount this promo grants on a subtotal.
    ///
    /// Fixed promos are capped at the subtotal so the discounted amount can
    /// never go negative. Pure: the same `(promo, subtotal)` pair always
    /// yields the same discount.
    ///
    /// # Errors
    ///
    /// - [`PromoError::Inactive`]: the promo has been deactivated.
    /// - [`PromoError::Math`]: percentage arithmetic overflowed.
    pub fn discount_on(
        &self,
        subtotal: Money<'static, Currency>,
    ) -> Result<Money<'static, Currency>, PromoError> {
        if !self.active {
            return Err(PromoError::Inactive(self.code.clone()));
        }

        let subtotal_minor = subtotal.to_minor_units();

        let discount_minor = match &self.kind {
            PromoKind::Percentage(rate) => percent_of_minor(rate, subtotal_minor)?,
            PromoKind::Fixed(amount) => amount.to_minor_units().min(subtotal_minor),
        };

        Ok(Money::from_minor(
            discount_minor.max(0),
            subtotal.currency(),
        ))
    }
}
