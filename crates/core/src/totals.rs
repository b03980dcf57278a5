//! Order and quote totals
//!
//! One place computes the money breakdown for a checkout or a dealer quote.
//! The dealer discount is already baked into unit prices before the subtotal
//! reaches this module; a promo discount arrives separately and is subtracted
//! before tax.

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::money::{MoneyMathError, percent_of_minor};

/// Flat shipping fee in minor units, charged on every order.
pub const SHIPPING_FLAT_MINOR: i64 = 9_900;

/// Sales tax rate applied to the discounted subtotal.
#[must_use]
pub fn tax_rate() -> Percentage {
    Percentage::from(0.10)
}

/// Errors from totals computation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TotalsError {
    /// Wrapped minor-unit arithmetic error.
    #[error(transparent)]
    Math(#[from] MoneyMathError),
}

/// The full money breakdown of a checkout.
///
/// Invariant: `total == (subtotal - discount) + tax + shipping`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckoutTotals {
    subtotal: Money<'static, Currency>,
    discount: Money<'static, Currency>,
    tax: Money<'static, Currency>,
    shipping: Money<'static, Currency>,
    total: Money<'static, Currency>,
}

impl CheckoutTotals {
    /// Sum of priced line subtotals.
    #[must_use]
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// Promo discount actually applied (already capped at the subtotal).
    #[must_use]
    pub fn discount(&self) -> Money<'static, Currency> {
        self.discount
    }

    /// Tax on the discounted subtotal.
    #[must_use]
    pub fn tax(&self) -> Money<'static, Currency> {
        self.tax
    }

    /// Flat shipping fee.
    #[must_use]
    pub fn shipping(&self) -> Money<'static, Currency> {
        self.shipping
    }

    /// Amount to charge.
    #[must_use]
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }
}

/// Totals for a dealer quote: same tax rule as checkout, no shipping line and
/// no promo, because a quote is a non-binding snapshot rather than a sale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteTotals {
    subtotal: Money<'static, Currency>,
    tax: Money<'static, Currency>,
    total: Money<'static, Currency>,
}

impl QuoteTotals {
    /// Sum of dealer-priced line subtotals.
    #[must_use]
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// Tax on the subtotal.
    #[must_use]
    pub fn tax(&self) -> Money<'static, Currency> {
        self.tax
    }

    /// Quoted total.
    #[must_use]
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }
}

/// Compute checkout totals from a subtotal and a promo discount.
///
/// The discount is clamped to `0..=subtotal` so the taxable amount can never
/// go negative, matching the promo cap rule.
///
/// # Errors
///
/// Returns [`TotalsError::Math`] if any amount overflows minor-unit
/// arithmetic.
pub fn checkout_totals(
    subtotal: Money<'static, Currency>,
    discount: Money<'static, Currency>,
) -> Result<CheckoutTotals, TotalsError> {
    let currency = subtotal.currency();
    let subtotal_minor = subtotal.to_minor_units();
    let discount_minor = discount.to_minor_units().clamp(0, subtotal_minor);

    let discounted_minor = subtotal_minor - discount_minor;
    let tax_minor = percent_of_minor(&tax_rate(), discounted_minor)?;

    let total_minor = discounted_minor
        .checked_add(tax_minor)
        .and_then(|sum| sum.checked_add(SHIPPING_FLAT_MINOR))
        .ok_or(MoneyMathError::AmountOverflow)?;

    Ok(CheckoutTotals {
        subtotal,
        discount: Money::from_minor(discount_minor, currency),
        tax: Money::from_minor(tax_minor, currency),
        shipping: Money::from_minor(SHIPPING_FLAT_MINOR, currency),
        total: Money::from_minor(total_minor, currency),
    })
}

/// Compute quote totals from a dealer-priced subtotal.
///
/// # Errors
///
/// Returns [`TotalsError::Math`] if any amount overflows minor-unit
/// arithmetic.
pub fn quote_totals(subtotal: Money<'static, Currency>) -> Result<QuoteTotals, TotalsError> {
    let currency = subtotal.currency();
    let subtotal_minor = subtotal.to_minor_units();

    let tax_minor = percent_of_minor(&tax_rate(), subtotal_minor)?;

    let total_minor = subtotal_minor
        .checked_add(tax_minor)
        .ok_or(MoneyMathError::AmountOverflow)?;

    Ok(QuoteTotals {
        subtotal,
        tax: Money::from_minor(tax_minor, currency),
        total: Money::from_minor(total_minor, currency),
    })
}
