//! Payment errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// The provider rejected the charge. Checkout halts at the payment step;
    /// the buyer can resubmit.
    #[error("payment declined ({kind}): {message}")]
    Declined { kind: String, message: String },

    /// The provider could not be reached or answered unusably. At
    /// authorization creation this triggers the mock fallback; at
    /// confirmation of a real intent it is fatal.
    #[error("payment provider unavailable: {0}")]
    ProviderUnavailable(String),
}
