//! Payment negotiator.

use std::sync::Arc;

use jiff::Timestamp;
use rand::{Rng, distributions::Alphanumeric, thread_rng};
use tracing::{debug, warn};

use crate::domain::payments::{
    PaymentGateway,
    errors::PaymentError,
    models::{MOCK_INTENT_PREFIX, PaymentAuthorization},
};

/// Intent statuses we accept as a completed confirmation.
const CONFIRMED_STATUSES: [&str; 2] = ["succeeded", "requires_capture"];

/// Negotiates payment authorizations against an optional gateway.
///
/// With no gateway configured every authorization is a mock. With a gateway,
/// unreachability at *creation* time degrades to a mock so checkout can
/// proceed; unreachability at *confirmation* time of a real intent is fatal
/// and surfaced unchanged. There are no retries at this layer — resubmission
/// is the caller's decision.
#[derive(Clone)]
pub struct PaymentNegotiator {
    gateway: Option<Arc<dyn PaymentGateway>>,
}

impl PaymentNegotiator {
    #[must_use]
    pub fn new(gateway: Option<Arc<dyn PaymentGateway>>) -> Self {
        Self { gateway }
    }

    /// Whether a real payment provider is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.gateway.is_some()
    }

    /// Create an authorization for `amount` minor units of `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Declined`] when the provider rejects the
    /// charge; checkout halts and the buyer may resubmit. Provider
    /// unavailability does not error here — it falls back to a mock.
    pub async fn create_authorization(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentAuthorization, PaymentError> {
        let Some(gateway) = &self.gateway else {
            debug!("payment gateway not configured; issuing mock authorization");

            return Ok(mock_authorization(amount, currency));
        };

        match gateway.create_intent(amount, currency).await {
            Ok(intent) => Ok(PaymentAuthorization {
                intent_id: intent.id,
                client_secret: intent.client_secret,
                mock: false,
                amount,
                currency: currency.to_string(),
            }),
            Err(PaymentError::ProviderUnavailable(reason)) => {
                warn!(%reason, "payment provider unreachable; falling back to mock authorization");

                Ok(mock_authorization(amount, currency))
            }
            Err(declined) => Err(declined),
        }
    }

    /// Confirm an authorization.
    ///
    /// Mock authorizations confirm synchronously as a no-op. For real ones
    /// the provider is consulted, and any failure here — including
    /// unavailability — is surfaced to the caller.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::Declined`]: the provider did not settle the intent.
    /// - [`PaymentError::ProviderUnavailable`]: the provider could not be
    ///   reached while confirming a real intent (fatal at this stage).
    pub async fn confirm_authorization(
        &self,
        authorization: &PaymentAuthorization,
    ) -> Result<(), PaymentError> {
        if authorization.mock {
            debug!(
                intent_id = authorization.intent_id,
                "mock authorization confirmed"
            );

            return Ok(());
        }

        let Some(gateway) = &self.gateway else {
            return Err(PaymentError::ProviderUnavailable(
                "no payment gateway configured to confirm a real intent".to_string(),
            ));
        };

        let intent = gateway.confirm(&authorization.intent_id).await?;

        if CONFIRMED_STATUSES.contains(&intent.status.as_str()) {
            Ok(())
        } else {
            Err(PaymentError::Declined {
                kind: "confirmation_failed".to_string(),
                message: format!("intent ended in status {:?}", intent.status),
            })
        }
    }
}

fn mock_authorization(amount: i64, currency: &str) -> PaymentAuthorization {
    let suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect();

    PaymentAuthorization {
        intent_id: format!(
            "{MOCK_INTENT_PREFIX}{}_{suffix}",
            Timestamp::now().as_millisecond()
        ),
        client_secret: None,
        mock: true,
        amount,
        currency: currency.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::payments::{MockPaymentGateway, models::PaymentIntent};

    use super::*;

    fn intent(id: &str, status: &str) -> PaymentIntent {
        PaymentIntent {
            id: id.to_string(),
            client_secret: Some(format!("{id}_secret")),
            status: status.to_string(),
        }
    }

    #[tokio::test]
    async fn unconfigured_negotiator_issues_mock_authorizations() -> TestResult {
        let negotiator = PaymentNegotiator::new(None);

        let authorization = negotiator.create_authorization(109_890, "usd").await?;

        assert!(authorization.mock);
        assert!(authorization.intent_id.starts_with(MOCK_INTENT_PREFIX));
        assert_eq!(authorization.client_secret, None);
        assert_eq!(authorization.amount, 109_890);

        Ok(())
    }

    #[tokio::test]
    async fn provider_outage_at_creation_falls_back_to_mock() -> TestResult {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_intent().returning(|_, _| {
            Err(PaymentError::ProviderUnavailable(
                "connection refused".to_string(),
            ))
        });

        let negotiator = PaymentNegotiator::new(Some(Arc::new(gateway)));

        let authorization = negotiator.create_authorization(50_000, "usd").await?;

        assert!(authorization.mock);
        assert!(authorization.intent_id.starts_with(MOCK_INTENT_PREFIX));

        Ok(())
    }

    #[tokio::test]
    async fn decline_at_creation_halts_checkout() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_intent().returning(|_, _| {
            Err(PaymentError::Declined {
                kind: "card_error".to_string(),
                message: "declined".to_string(),
            })
        });

        let negotiator = PaymentNegotiator::new(Some(Arc::new(gateway)));

        let result = negotiator.create_authorization(50_000, "usd").await;

        assert!(matches!(result, Err(PaymentError::Declined { .. })));
    }

    #[tokio::test]
    async fn real_intent_carries_provider_details() -> TestResult {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_intent()
            .returning(|_, _| Ok(intent("pi_123", "requires_payment_method")));

        let negotiator = PaymentNegotiator::new(Some(Arc::new(gateway)));

        let authorization = negotiator.create_authorization(75_000, "usd").await?;

        assert!(!authorization.mock);
        assert_eq!(authorization.intent_id, "pi_123");
        assert_eq!(authorization.client_secret.as_deref(), Some("pi_123_secret"));

        Ok(())
    }

    #[tokio::test]
    async fn mock_confirmation_is_a_no_op() -> TestResult {
        let negotiator = PaymentNegotiator::new(None);
        let authorization = negotiator.create_authorization(10_000, "usd").await?;

        negotiator.confirm_authorization(&authorization).await?;

        Ok(())
    }

    #[tokio::test]
    async fn outage_during_real_confirmation_is_fatal() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_intent().returning(|_, _| Ok(intent("pi_9", "requires_payment_method")));
        gateway.expect_confirm().returning(|_| {
            Err(PaymentError::ProviderUnavailable("timeout".to_string()))
        });

        let negotiator = PaymentNegotiator::new(Some(Arc::new(gateway)));

        let authorization = negotiator
            .create_authorization(10_000, "usd")
            .await
            .unwrap_or_else(|_| unreachable!("creation should succeed"));

        let result = negotiator.confirm_authorization(&authorization).await;

        assert!(matches!(result, Err(PaymentError::ProviderUnavailable(_))));
    }

    #[tokio::test]
    async fn unsettled_confirmation_is_declined() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_confirm().returning(|id| Ok(intent(id, "requires_payment_method")));

        let negotiator = PaymentNegotiator::new(Some(Arc::new(gateway)));

        let authorization = PaymentAuthorization {
            intent_id: "pi_unsettled".to_string(),
            client_secret: None,
            mock: false,
            amount: 10_000,
            currency: "usd".to_string(),
        };

        let result = negotiator.confirm_authorization(&authorization).await;

        assert!(matches!(result, Err(PaymentError::Declined { .. })));
    }

    #[tokio::test]
    async fn settled_confirmation_succeeds() -> TestResult {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_confirm().returning(|id| Ok(intent(id, "succeeded")));

        let negotiator = PaymentNegotiator::new(Some(Arc::new(gateway)));

        let authorization = PaymentAuthorization {
            intent_id: "pi_settled".to_string(),
            client_secret: None,
            mock: false,
            amount: 10_000,
            currency: "usd".to_string(),
        };

        negotiator.confirm_authorization(&authorization).await?;

        Ok(())
    }
}
