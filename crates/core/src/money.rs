//! Minor-unit money arithmetic
//!
//! Shared helpers for applying fractional rates to amounts expressed in minor
//! currency units. All rounding goes through a single strategy so that every
//! caller (pricing tiers, promo discounts, tax) rounds the same way.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

/// Errors specific to minor-unit arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyMathError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// A minor-unit amount overflowed the representable range.
    #[error("amount overflowed the minor-unit range")]
    AmountOverflow,
}

/// Calculate a percentage of an amount in minor units.
///
/// Rounds to whole minor units with midpoint-away-from-zero, so `10%` of an
/// odd cent amount never silently loses or invents a cent relative to the
/// complementary share.
///
/// # Errors
///
/// Returns [`MoneyMathError::PercentConversion`] if the calculation overflows
/// or cannot be represented as an `i64`.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, MoneyMathError> {
    let minor = Decimal::from_i64(minor).ok_or(MoneyMathError::PercentConversion)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(MoneyMathError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(MoneyMathError::PercentConversion)
}

/// Multiply a minor-unit amount by a quantity, checked.
///
/// # Errors
///
/// Returns [`MoneyMathError::AmountOverflow`] if the product exceeds `i64`.
pub fn scale_minor(minor: i64, quantity: u32) -> Result<i64, MoneyMathError> {
    minor
        .checked_mul(i64::from(quantity))
        .ok_or(MoneyMathError::AmountOverflow)
}
