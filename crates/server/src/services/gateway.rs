//! Payment gateway REST client and signature verification.
//!
//! The gateway exposes an orders API: the server creates a gateway order
//! before the client pays, and the gateway calls back with a payment id and
//! an HMAC-SHA256 signature over `"{order_id}|{payment_id}"` keyed on the
//! API key secret. [`verify_payment_signature`] is the only gate between a
//! client-supplied payload and a paid order row.

use std::sync::Arc;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use sha2::Sha256;
use thiserror::Error;

use crate::config::GatewayConfig;

type HmacSha256 = Hmac<Sha256>;

/// Errors from the payment gateway client.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level failure.
    #[error("gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway rate limited us; retry after the given seconds.
    #[error("gateway rate limited, retry after {0}s")]
    RateLimited(u64),

    /// Gateway returned a non-success status.
    #[error("gateway returned {status}: {message}")]
    Api {
        status: u16,
        message: String,
    },
}

/// A gateway-side order, created before the client is charged.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    /// Gateway order id (e.g. `order_Nxw...`).
    pub id: String,
    /// Amount in minor units.
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// Client for the payment gateway REST API.
///
/// Cheaply cloneable; holds a shared `reqwest::Client`.
#[derive(Clone)]
pub struct PaymentGateway {
    inner: Arc<PaymentGatewayInner>,
}

struct PaymentGatewayInner {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: SecretString,
}

impl PaymentGateway {
    /// Create a new gateway client.
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            inner: Arc::new(PaymentGatewayInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
                key_id: config.key_id.clone(),
                key_secret: config.key_secret.clone(),
            }),
        }
    }

    /// The public API key id, surfaced to the checkout client.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.inner.key_id
    }

    /// Create a gateway order for `amount_minor` minor units.
    ///
    /// `receipt` is our order receipt reference, echoed back in gateway
    /// dashboards.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure, rate limiting, or a
    /// non-success gateway response.
    pub async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, GatewayError> {
        let url = format!("{}/v1/orders", self.inner.base_url);

        let response = self
            .inner
            .client
            .post(&url)
            .basic_auth(&self.inner.key_id, Some(self.inner.key_secret.expose_secret()))
            .json(&json!({
                "amount": amount_minor,
                "currency": currency,
                "receipt": receipt,
            }))
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(GatewayError::RateLimited(retry_after));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "gateway order creation failed"
            );
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Ok(response.json::<GatewayOrder>().await?)
    }

    /// Fetch an existing gateway order by id.
    ///
    /// Finalization re-reads the gateway order so the amount actually
    /// charged can be checked against the draft being finalized.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure, rate limiting, or a
    /// non-success gateway response (including an unknown order id).
    pub async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, GatewayError> {
        let url = format!("{}/v1/orders/{}", self.inner.base_url, order_id);

        let response = self
            .inner
            .client
            .get(&url)
            .basic_auth(&self.inner.key_id, Some(self.inner.key_secret.expose_secret()))
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(GatewayError::RateLimited(retry_after));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                order_id,
                "gateway order fetch failed"
            );
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Ok(response.json::<GatewayOrder>().await?)
    }

    /// Verify a payment callback signature against this client's key secret.
    #[must_use]
    pub fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        verify_payment_signature(
            self.inner.key_secret.expose_secret(),
            order_id,
            payment_id,
            signature,
        )
    }
}

/// Verify an `HMAC-SHA256(secret, "{order_id}|{payment_id}")` hex signature.
///
/// Comparison happens inside `Mac::verify_slice`, which is constant-time.
/// Any malformed hex fails closed.
#[must_use]
pub fn verify_payment_signature(
    secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> bool {
    let Ok(signature_bytes) = hex::decode(signature) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());

    mac.verify_slice(&signature_bytes).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac key");
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_signature_accepted() {
        let sig = sign("key_secret", "order_123", "pay_456");
        assert!(verify_payment_signature("key_secret", "order_123", "pay_456", &sig));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let sig = sign("other_secret", "order_123", "pay_456");
        assert!(!verify_payment_signature("key_secret", "order_123", "pay_456", &sig));
    }

    #[test]
    fn test_tampered_ids_rejected() {
        let sig = sign("key_secret", "order_123", "pay_456");
        assert!(!verify_payment_signature("key_secret", "order_999", "pay_456", &sig));
        assert!(!verify_payment_signature("key_secret", "order_123", "pay_999", &sig));
    }

    #[test]
    fn test_malformed_hex_rejected() {
        assert!(!verify_payment_signature("key_secret", "order_123", "pay_456", "zzzz"));
        assert!(!verify_payment_signature("key_secret", "order_123", "pay_456", ""));
    }

    #[test]
    fn test_truncated_signature_rejected() {
        let sig = sign("key_secret", "order_123", "pay_456");
        assert!(!verify_payment_signature(
            "key_secret",
            "order_123",
            "pay_456",
            &sig[..sig.len() - 2]
        ));
    }

    #[test]
    fn test_separator_is_part_of_message() {
        // "order_1|2" / "pay" must not collide with "order_1" / "2|pay"
        let sig = sign("key_secret", "order_1|2", "pay");
        assert!(!verify_payment_signature("key_secret", "order_1", "2|pay", &sig));
    }
}
