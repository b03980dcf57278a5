//! Payments
//!
//! One capability-checked entry point for payment authorizations. The real
//! path talks to Stripe; when no credentials are configured (or the provider
//! is unreachable at authorization time) the negotiator issues an explicit
//! mock authorization so non-production checkouts can still complete.

pub mod errors;
pub mod models;
mod negotiator;
mod stripe;

pub use errors::PaymentError;
pub use models::{MOCK_INTENT_PREFIX, PaymentAuthorization, PaymentIntent, SERVICE_CURRENCY};
pub use negotiator::PaymentNegotiator;
pub use stripe::{StripeConfig, StripeGateway};

use async_trait::async_trait;
use mockall::automock;

/// An external payment provider: one `create` and one `confirm` operation
/// over amounts in minor currency units.
#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent for `amount` minor units of `currency`.
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError>;

    /// Confirm a previously created intent; returns its resulting status.
    async fn confirm(&self, intent_id: &str) -> Result<PaymentIntent, PaymentError>;
}
