//! Payment gateway client.
//!
//! Queries the gateway's transaction-status API with a signed request. The
//! response body is returned as-is for the caller to relay.

use crate::config::GatewayConfig;
use crate::services::metrics::record_gateway_check;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use service_core::error::AppError;
use service_core::utils::signature::{sign_request, SignedRequest};
use std::time::Duration;

/// Credentials for a single status check.
#[derive(Debug, Clone)]
pub struct StatusCheck {
    pub merchant_id: String,
    pub reference_number: String,
    pub secret_key: Secret<String>,
}

#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    config: GatewayConfig,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    /// Status endpoint for a reference number.
    pub fn transaction_url(&self, reference_number: &str) -> String {
        format!(
            "{}/api/1.0/transaction/{}",
            self.config.base_url,
            urlencoding::encode(reference_number)
        )
    }

    /// Sign and send a status check, returning the gateway's JSON body.
    pub async fn check_transaction(
        &self,
        check: &StatusCheck,
    ) -> Result<serde_json::Value, AppError> {
        let secret = check.secret_key.expose_secret();
        let signed = sign_request(&check.merchant_id, &check.reference_number, secret);

        let result = self.send(check, &signed).await;
        record_gateway_check(if result.is_ok() { "ok" } else { "error" });
        result
    }

    async fn send(
        &self,
        check: &StatusCheck,
        signed: &SignedRequest,
    ) -> Result<serde_json::Value, AppError> {
        let url = self.transaction_url(&check.reference_number);

        let mut query = vec![
            ("signature", signed.signature.as_str()),
            ("merchantId", check.merchant_id.as_str()),
            ("timestamp", signed.timestamp.as_str()),
            ("nonce", signed.nonce.as_str()),
        ];
        if self.config.secret_in_query {
            query.push(("secretKey", check.secret_key.expose_secret().as_str()));
        }

        let mut request = self.client.get(&url).query(&query);
        if !self.config.secret_in_query {
            request = request.header(
                self.config.secret_header.as_str(),
                check.secret_key.expose_secret().as_str(),
            );
        }

        tracing::debug!(
            url = %url,
            merchant_id = %check.merchant_id,
            reference_number = %check.reference_number,
            timestamp = %signed.timestamp,
            "Sending gateway status check"
        );

        // The URL may carry the secret in legacy mode, so strip it from errors.
        let response = request.send().await.map_err(|e| {
            let e = e.without_url();
            tracing::error!(error = %e, "Gateway request failed");
            AppError::GatewayError(anyhow::anyhow!("{}", e))
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::GatewayError(anyhow::anyhow!("{}", e.without_url())))?;

        tracing::debug!(status = %status, "Gateway status check response");

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(status = %status, error = %e, "Gateway returned a non-JSON body");
            AppError::GatewayError(anyhow::anyhow!(
                "Invalid gateway response (HTTP {}): {}",
                status.as_u16(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> GatewayConfig {
        GatewayConfig {
            base_url: "https://pay.example.com".to_string(),
            secret_in_query: false,
            secret_header: "x-secret-key".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_transaction_url() {
        let client = GatewayClient::new(test_config()).unwrap();

        assert_eq!(
            client.transaction_url("ORD-1"),
            "https://pay.example.com/api/1.0/transaction/ORD-1"
        );
    }

    #[test]
    fn test_transaction_url_escapes_reference() {
        let client = GatewayClient::new(test_config()).unwrap();

        assert_eq!(
            client.transaction_url("a/b?c"),
            "https://pay.example.com/api/1.0/transaction/a%2Fb%3Fc"
        );
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_gateway_error() {
        let config = GatewayConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            ..test_config()
        };
        let client = GatewayClient::new(config).unwrap();

        let err = client
            .check_transaction(&StatusCheck {
                merchant_id: "M1".to_string(),
                reference_number: "R1".to_string(),
                secret_key: Secret::new("secret".to_string()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::GatewayError(_)));
    }
}
