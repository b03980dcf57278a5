//! Stripe payment gateway client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::domain::payments::{
    PaymentGateway, errors::PaymentError, models::PaymentIntent,
};

const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Configuration for the Stripe client.
///
/// `secret_key` is optional on purpose: its absence is the signal that the
/// process runs without a payment provider and checkout should use mock
/// authorizations.
#[derive(Debug, Clone, Default)]
pub struct StripeConfig {
    /// Secret API key; `None` or blank means unconfigured.
    pub secret_key: Option<String>,

    /// Override for the API base URL (used by tests and proxies).
    pub api_base: Option<String>,
}

/// HTTP client for Stripe's payment-intents API.
#[derive(Debug)]
pub struct StripeGateway {
    http: Client,
    secret_key: Zeroizing<String>,
    api_base: String,
}

impl StripeGateway {
    /// Build a gateway from configuration, or `None` when no usable secret
    /// key is present.
    #[must_use]
    pub fn from_config(config: StripeConfig) -> Option<Self> {
        let secret_key = config.secret_key.filter(|key| !key.trim().is_empty())?;

        Some(Self {
            http: Client::new(),
            secret_key: Zeroizing::new(secret_key),
            api_base: config
                .api_base
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        })
    }

    async fn post_form(
        &self,
        url: String,
        params: &[(&str, String)],
    ) -> Result<PaymentIntent, PaymentError> {
        let response = self
            .http
            .post(&url)
            .bearer_auth(self.secret_key.as_str())
            .form(params)
            .send()
            .await
            .map_err(|error| PaymentError::ProviderUnavailable(error.to_string()))?;

        let status = response.status();

        if status.is_success() {
            return response
                .json::<PaymentIntent>()
                .await
                .map_err(|error| PaymentError::ProviderUnavailable(error.to_string()));
        }

        match response.json::<ApiErrorResponse>().await {
            Ok(body) if matches!(body.error.kind.as_str(), "card_error" | "validation_error") => {
                Err(PaymentError::Declined {
                    kind: body.error.kind,
                    message: body.error.message.unwrap_or_default(),
                })
            }
            Ok(body) => Err(PaymentError::ProviderUnavailable(format!(
                "status {status}: {}",
                body.error.kind
            ))),
            Err(_) => Err(PaymentError::ProviderUnavailable(format!(
                "unexpected response with status {status}"
            ))),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        let url = format!("{}/v1/payment_intents", self.api_base);

        let params = [
            ("amount", amount.to_string()),
            ("currency", currency.to_string()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
        ];

        self.post_form(url, &params).await
    }

    async fn confirm(&self, intent_id: &str) -> Result<PaymentIntent, PaymentError> {
        let url = format!("{}/v1/payment_intents/{intent_id}/confirm", self.api_base);

        self.post_form(url, &[]).await
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type")]
    kind: String,
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_requires_a_secret_key() {
        assert!(StripeGateway::from_config(StripeConfig::default()).is_none());

        assert!(
            StripeGateway::from_config(StripeConfig {
                secret_key: Some("   ".to_string()),
                api_base: None,
            })
            .is_none()
        );

        assert!(
            StripeGateway::from_config(StripeConfig {
                secret_key: Some("sk_test_123".to_string()),
                api_base: None,
            })
            .is_some()
        );
    }

    #[test]
    fn error_body_parses_stripe_shape() {
        let body = r#"{"error":{"type":"card_error","message":"Your card was declined."}}"#;

        let parsed: ApiErrorResponse =
            serde_json::from_str(body).unwrap_or_else(|_| unreachable!("valid fixture"));

        assert_eq!(parsed.error.kind, "card_error");
        assert_eq!(
            parsed.error.message.as_deref(),
            Some("Your card was declined.")
        );
    }
}
