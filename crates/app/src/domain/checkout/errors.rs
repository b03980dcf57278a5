//! Checkout errors.

use sprocket::{pricing::PricingError, totals::TotalsError};
use thiserror::Error;

use crate::domain::{
    catalog::models::BikeUuid, orders::errors::OrderError, payments::errors::PaymentError,
    promos::errors::PromoLedgerError,
};

#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A required request field was missing or malformed; rejected before
    /// any side effect.
    #[error("missing required field {0}")]
    Validation(&'static str),

    #[error("cart is empty")]
    EmptyCart,

    #[error("bike {0} not found")]
    BikeNotFound(BikeUuid),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Totals(#[from] TotalsError),

    /// Promo lookup/application failure. Non-fatal: the caller may repeat
    /// checkout without a code; the engine never silently applies a zero
    /// discount.
    #[error(transparent)]
    Promo(#[from] PromoLedgerError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// The order could not be persisted *after* the payment was confirmed.
    /// Fatal and logged; requires manual reconciliation — there is no
    /// automatic refund or compensation.
    #[error(
        "order persistence failed after payment confirmation; reconcile payment {payment_intent_id} manually"
    )]
    ReconciliationRequired {
        payment_intent_id: String,
        #[source]
        source: OrderError,
    },

    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}
