use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::core::config::NagadConfig;
use crate::core::error::{AppError, Result};
use crate::features::orders::services::OrderService;
use crate::features::payments::dtos::PaymentRedirectDto;

const PROVIDER_SUCCESS: &str = "Success";

/// Nagad gateway adapter. All provider failures surface as
/// `ExternalServiceError` with a generic message; raw provider output is
/// logged server-side only.
pub struct NagadService {
    http: reqwest::Client,
    config: NagadConfig,
    orders: Arc<OrderService>,
}

#[derive(Debug, serde::Deserialize)]
struct InitializeResponse {
    #[serde(rename = "paymentReferenceId")]
    payment_reference_id: Option<String>,
    challenge: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct CompleteResponse {
    #[serde(rename = "callBackUrl")]
    call_back_url: Option<String>,
}

impl NagadService {
    pub fn new(config: NagadConfig, orders: Arc<OrderService>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build payment HTTP client: {:?}", e);
                AppError::Internal("Failed to initialize payment client".to_string())
            })?;

        Ok(Self {
            http,
            config,
            orders,
        })
    }

    /// Two-step checkout handshake: initialize, then complete with the
    /// echoed provider challenge. Returns the URL the customer is sent to.
    /// The order row is not touched here.
    pub async fn initialize(
        &self,
        order_id: Uuid,
        user_id: Uuid,
        customer_mobile: Option<String>,
    ) -> Result<PaymentRedirectDto> {
        let order = self.orders.get(order_id, user_id).await?;
        let mobile = customer_mobile.unwrap_or_else(|| order.customer_mobile.clone());

        let challenge = generate_challenge();
        let payload = build_checkout_payload(
            &self.config.merchant_id,
            order.id,
            &order.order_number,
            order.total,
            Utc::now(),
            &challenge,
        );
        let signature = sign_payload(&payload);

        let initialize_url = format!(
            "{}/check-out/initialize/{}/{}",
            self.config.base_url, self.config.merchant_id, order.order_number
        );
        let init: InitializeResponse = self
            .post_json(
                &initialize_url,
                &serde_json::json!({
                    "accountNumber": mobile,
                    "dateTime": Utc::now().format("%Y%m%d%H%M%S").to_string(),
                    "sensitiveData": payload,
                    "signature": signature,
                }),
            )
            .await?;

        let payment_ref_id = init.payment_reference_id.ok_or_else(|| {
            tracing::error!("Gateway initialize response missing payment reference");
            payment_unavailable()
        })?;
        let provider_challenge = init.challenge.ok_or_else(|| {
            tracing::error!("Gateway initialize response missing challenge");
            payment_unavailable()
        })?;

        let complete_url = format!(
            "{}/check-out/complete/{}",
            self.config.base_url, payment_ref_id
        );
        let complete: CompleteResponse = self
            .post_json(
                &complete_url,
                &complete_request_body(
                    &provider_challenge,
                    order.total,
                    &self.config.merchant_number,
                    &self.config.callback_url,
                ),
            )
            .await?;

        let redirect_url = complete.call_back_url.ok_or_else(|| {
            tracing::error!("Gateway complete response missing redirect URL");
            payment_unavailable()
        })?;

        tracing::info!(
            "Payment initialized: order={}, ref={}",
            order.order_number,
            payment_ref_id
        );
        Ok(PaymentRedirectDto {
            payment_ref_id,
            redirect_url,
        })
    }

    /// Re-verifies the payment against the provider and marks the order
    /// paid only on a provider-confirmed success. Returns whether the
    /// payment is confirmed.
    pub async fn confirm_callback(&self, payment_ref_id: &str, order_id: Uuid) -> Result<bool> {
        let verify_url = format!("{}/verify/payment/{}", self.config.base_url, payment_ref_id);

        let response = self.http.get(&verify_url).send().await.map_err(|e| {
            tracing::error!("Payment verification request failed: {:?}", e);
            payment_unavailable()
        })?;

        if !response.status().is_success() {
            tracing::warn!(
                "Payment verification returned HTTP {}: ref={}",
                response.status(),
                payment_ref_id
            );
            return Ok(false);
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            tracing::error!("Payment verification returned invalid JSON: {:?}", e);
            payment_unavailable()
        })?;

        let confirmed = body
            .get("status")
            .and_then(|s| s.as_str())
            .map(|s| s == PROVIDER_SUCCESS)
            .unwrap_or(false);

        if confirmed {
            self.orders.mark_paid(order_id, payment_ref_id, body).await?;
            tracing::info!("Payment confirmed: order={}, ref={}", order_id, payment_ref_id);
        } else {
            tracing::warn!(
                "Payment not confirmed by provider: order={}, ref={}",
                order_id,
                payment_ref_id
            );
        }
        Ok(confirmed)
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T> {
        let response = self.http.post(url).json(body).send().await.map_err(|e| {
            tracing::error!("Gateway request failed: url={}, error={:?}", url, e);
            payment_unavailable()
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Gateway returned HTTP {}: url={}", status, url);
            return Err(payment_unavailable());
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!("Gateway returned invalid JSON: url={}, error={:?}", url, e);
            payment_unavailable()
        })
    }
}

fn payment_unavailable() -> AppError {
    AppError::ExternalServiceError("Payment service is currently unavailable".to_string())
}

fn generate_challenge() -> String {
    let bytes: [u8; 20] = rand::thread_rng().gen();
    hex::encode(bytes)
}

/// Dated payload the signature covers: merchant, order identity, amount
/// and challenge, pipe-delimited in a fixed field order.
fn build_checkout_payload(
    merchant_id: &str,
    order_id: Uuid,
    order_number: &str,
    amount: Decimal,
    now: DateTime<Utc>,
    challenge: &str,
) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}",
        merchant_id,
        order_id,
        order_number,
        amount,
        now.format("%Y%m%d%H%M%S"),
        challenge
    )
}

fn sign_payload(payload: &str) -> String {
    let digest = Sha256::digest(payload.as_bytes());
    BASE64.encode(digest)
}

/// Body of the complete step: the echoed challenge plus the amount, the
/// receiving merchant wallet and where the gateway should send the
/// customer afterwards. Currency 050 is BDT.
fn complete_request_body(
    challenge: &str,
    amount: Decimal,
    merchant_number: &str,
    callback_url: &str,
) -> serde_json::Value {
    serde_json::json!({
        "challenge": challenge,
        "amount": amount.to_string(),
        "currencyCode": "050",
        "merchantMobileNo": merchant_number,
        "merchantCallbackURL": callback_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn payload_field_order_is_stable() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 12, 30, 0).unwrap();
        let payload = build_checkout_payload(
            "MID01",
            Uuid::from_u128(7),
            "ORD-20250901-00ab12",
            Decimal::from_str("2060").unwrap(),
            now,
            "deadbeef",
        );
        assert_eq!(
            payload,
            "MID01|00000000-0000-0000-0000-000000000007|ORD-20250901-00ab12|2060|20250901123000|deadbeef"
        );
    }

    #[test]
    fn signature_is_base64_sha256() {
        let signature = sign_payload("abc");
        // SHA-256("abc"), base64-encoded
        assert_eq!(signature, "ungWv48Bz+pBQUDeXa4iI7ADYaOWF3qctBD/YfIAFa0=");
    }

    #[test]
    fn complete_body_carries_merchant_wallet_and_callback() {
        let body = complete_request_body(
            "ch4ll3nge",
            Decimal::from_str("2060").unwrap(),
            "01700000000",
            "https://shop.example.com/api/payments/nagad/callback",
        );

        assert_eq!(body["challenge"], "ch4ll3nge");
        assert_eq!(body["amount"], "2060");
        assert_eq!(body["currencyCode"], "050");
        assert_eq!(body["merchantMobileNo"], "01700000000");
        assert_eq!(
            body["merchantCallbackURL"],
            "https://shop.example.com/api/payments/nagad/callback"
        );
    }

    #[test]
    fn challenge_is_40_hex_chars() {
        let challenge = generate_challenge();
        assert_eq!(challenge.len(), 40);
        assert!(challenge.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
