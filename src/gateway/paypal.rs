//! Payment processor integration.
//!
//! The trait abstracts the external payment provider as three operations:
//! order creation, capture and refund. The production implementation talks to
//! the PayPal REST API (client-credentials token, then the checkout and
//! payments endpoints); the mock always succeeds and is used in tests.

use crate::config::PayPalConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;

/// Outcome of a capture attempt.
#[derive(Clone, Debug)]
pub struct CaptureOutcome {
    /// Whether the provider reported the capture as completed
    pub completed: bool,
    /// Provider capture id, when one was issued
    pub capture_id: Option<String>,
    /// Raw provider status string, for logging
    pub status: String,
}

/// External payment provider.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Create an order for the given amount, tagged with the booking
    /// reference. Returns the provider order id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Payment`] when the provider call fails.
    async fn create_order(&self, amount: f64, reference: &str) -> Result<String>;

    /// Capture a previously approved order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Payment`] when the provider call fails. A capture the
    /// provider *rejects* is not an error: it comes back as a
    /// [`CaptureOutcome`] with `completed == false`.
    async fn capture_order(&self, order_id: &str) -> Result<CaptureOutcome>;

    /// Refund a captured payment. Returns the provider refund id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Payment`] when the provider call fails.
    async fn refund(&self, capture_id: &str, amount: f64) -> Result<String>;
}

/// PayPal REST implementation.
pub struct PayPalGateway {
    http: reqwest::Client,
    config: PayPalConfig,
}

impl PayPalGateway {
    /// Create a gateway from configuration.
    #[must_use]
    pub fn new(config: PayPalConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Fetch an OAuth access token via the client-credentials grant.
    async fn access_token(&self) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/v1/oauth2/token", self.config.api_base))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| Error::Payment(format!("token request failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::Payment(format!("token request rejected: {e}")))?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Payment(format!("token response unreadable: {e}")))?;

        body["access_token"]
            .as_str()
            .map(ToString::to_string)
            .ok_or_else(|| Error::Payment("token response missing access_token".to_string()))
    }
}

#[async_trait]
impl PaymentProcessor for PayPalGateway {
    async fn create_order(&self, amount: f64, reference: &str) -> Result<String> {
        let token = self.access_token().await?;

        let body = serde_json::json!({
            "intent": "CAPTURE",
            "purchase_units": [{
                "amount": {
                    "currency_code": self.config.currency,
                    "value": format!("{amount:.2}"),
                },
                "reference_id": reference,
            }],
            "application_context": {
                "brand_name": self.config.brand_name,
                "locale": "en-US",
                "return_url": self.config.return_url,
                "cancel_url": self.config.cancel_url,
            },
        });

        let response: serde_json::Value = self
            .http
            .post(format!("{}/v2/checkout/orders", self.config.api_base))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Payment(format!("order creation failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::Payment(format!("order creation rejected: {e}")))?
            .json()
            .await
            .map_err(|e| Error::Payment(format!("order response unreadable: {e}")))?;

        response["id"]
            .as_str()
            .map(ToString::to_string)
            .ok_or_else(|| Error::Payment("order response missing id".to_string()))
    }

    async fn capture_order(&self, order_id: &str) -> Result<CaptureOutcome> {
        let token = self.access_token().await?;

        let response: serde_json::Value = self
            .http
            .post(format!(
                "{}/v2/checkout/orders/{order_id}/capture",
                self.config.api_base
            ))
            .bearer_auth(&token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| Error::Payment(format!("capture failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::Payment(format!("capture rejected: {e}")))?
            .json()
            .await
            .map_err(|e| Error::Payment(format!("capture response unreadable: {e}")))?;

        let status = response["status"].as_str().unwrap_or("UNKNOWN").to_string();
        // The capture id nests under the purchase unit; fall back to the
        // order id when the provider omits it.
        let capture_id = response["purchase_units"][0]["payments"]["captures"][0]["id"]
            .as_str()
            .or_else(|| response["id"].as_str())
            .map(ToString::to_string);

        Ok(CaptureOutcome {
            completed: status == "COMPLETED",
            capture_id,
            status,
        })
    }

    async fn refund(&self, capture_id: &str, amount: f64) -> Result<String> {
        let token = self.access_token().await?;

        let body = serde_json::json!({
            "amount": {
                "value": format!("{amount:.2}"),
                "currency_code": self.config.currency,
            },
        });

        let response: serde_json::Value = self
            .http
            .post(format!(
                "{}/v2/payments/captures/{capture_id}/refund",
                self.config.api_base
            ))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Payment(format!("refund failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::Payment(format!("refund rejected: {e}")))?
            .json()
            .await
            .map_err(|e| Error::Payment(format!("refund response unreadable: {e}")))?;

        response["id"]
            .as_str()
            .map(ToString::to_string)
            .ok_or_else(|| Error::Payment("refund response missing id".to_string()))
    }
}

/// Mock payment processor (always succeeds) for development and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct MockPaymentProcessor {
    /// When set, captures come back as not completed
    pub fail_capture: bool,
}

#[async_trait]
impl PaymentProcessor for MockPaymentProcessor {
    async fn create_order(&self, _amount: f64, reference: &str) -> Result<String> {
        Ok(format!("mock_order_{reference}"))
    }

    async fn capture_order(&self, order_id: &str) -> Result<CaptureOutcome> {
        if self.fail_capture {
            return Ok(CaptureOutcome {
                completed: false,
                capture_id: None,
                status: "DECLINED".to_string(),
            });
        }
        Ok(CaptureOutcome {
            completed: true,
            capture_id: Some(format!("mock_capture_{order_id}")),
            status: "COMPLETED".to_string(),
        })
    }

    async fn refund(&self, capture_id: &str, _amount: f64) -> Result<String> {
        Ok(format!("mock_refund_{capture_id}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_capture_succeeds_by_default() {
        let gateway = MockPaymentProcessor::default();
        let outcome = gateway.capture_order("order-1").await.unwrap();
        assert!(outcome.completed);
        assert_eq!(outcome.capture_id.as_deref(), Some("mock_capture_order-1"));
    }

    #[tokio::test]
    async fn mock_capture_can_be_declined() {
        let gateway = MockPaymentProcessor { fail_capture: true };
        let outcome = gateway.capture_order("order-1").await.unwrap();
        assert!(!outcome.completed);
        assert!(outcome.capture_id.is_none());
    }

    #[tokio::test]
    async fn mock_refund_returns_an_id() {
        let gateway = MockPaymentProcessor::default();
        let refund_id = gateway.refund("cap-9", 10.0).await.unwrap();
        assert_eq!(refund_id, "mock_refund_cap-9");
    }
}
