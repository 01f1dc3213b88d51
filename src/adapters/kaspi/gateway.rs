//! Kaspi Pay QR gateway adapter.
//!
//! Implements the `PaymentGateway` port against the Kaspi QR API.
//!
//! # Security
//!
//! - Every request body is signed with SHA-256 over its sorted fields and
//!   the merchant secret
//! - The secret lives in a `secrecy::SecretString` and never reaches logs
//!
//! # Configuration
//!
//! ```ignore
//! let gateway = KaspiGateway::new(config.kaspi.clone());
//! let checkout = gateway.create_qr_payment(request).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::config::KaspiConfig;
use crate::domain::foundation::Timestamp;
use crate::domain::payment::{PayloadSigner, QrCheckout};
use crate::ports::{
    CancellationAck, CreateQrPaymentRequest, GatewayError, GatewayPaymentStatus, PaymentGateway,
};

use super::wire::{id_string, request_body, CancelReply, CreateReply, ErrorReply, StatusReply};

/// Kaspi Pay gateway client.
pub struct KaspiGateway {
    config: KaspiConfig,
    signer: PayloadSigner,
    http_client: reqwest::Client,
}

impl KaspiGateway {
    pub fn new(config: KaspiConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Use a preconfigured HTTP client (proxies, TLS roots).
    pub fn with_client(config: KaspiConfig, http_client: reqwest::Client) -> Self {
        let signer = PayloadSigner::new(config.secret_key.clone());
        Self {
            config,
            signer,
            http_client,
        }
    }

    /// Signer sharing this gateway's merchant secret.
    pub fn signer(&self) -> &PayloadSigner {
        &self.signer
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/payment/{}", self.config.base_url(), path)
    }

    fn signed_body(
        &self,
        fields: impl IntoIterator<Item = (&'static str, Value)>,
    ) -> Map<String, Value> {
        let mut body = request_body(&self.config.merchant_id, Timestamp::now(), fields);
        self.signer.attach_signature(&mut body);
        body
    }

    /// POST a signed body and decode the reply.
    async fn post<R: DeserializeOwned>(
        &self,
        path: &str,
        body: &Map<String, Value>,
        timeout: Duration,
    ) -> Result<R, GatewayError> {
        let url = self.endpoint(path);

        let response = self
            .http_client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::timeout(format!("Kaspi did not respond within {:?}", timeout))
                } else {
                    GatewayError::network(format!("Kaspi request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let reply: ErrorReply = serde_json::from_str(&error_text).unwrap_or_default();
            let message = reply
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| format!("Kaspi API error: HTTP {}", status.as_u16()));
            let mut err = GatewayError::rejected(message);
            if let Some(code) = reply.code.as_ref().and_then(id_string) {
                err = err.with_provider_code(code);
            }
            return Err(err);
        }

        response.json::<R>().await.map_err(|e| {
            GatewayError::invalid_response(format!("Failed to parse Kaspi response: {}", e))
        })
    }
}

#[async_trait]
impl PaymentGateway for KaspiGateway {
    async fn create_qr_payment(
        &self,
        request: CreateQrPaymentRequest,
    ) -> Result<QrCheckout, GatewayError> {
        let body = self.signed_body([
            ("amount", Value::from(request.amount)),
            ("currency", Value::from(request.currency)),
            ("order_id", Value::from(request.order_id.as_str())),
            ("description", Value::from(request.description)),
            ("client_id", Value::from(request.client_id.as_str())),
            ("success_url", Value::from(self.config.success_url.as_str())),
            ("failure_url", Value::from(self.config.failure_url.as_str())),
        ]);

        let result = self
            .post::<CreateReply>("create", &body, self.config.create_timeout())
            .await
            .and_then(CreateReply::into_checkout);

        match &result {
            Ok(checkout) => tracing::info!(
                order_id = %request.order_id,
                gateway_payment_id = %checkout.gateway_payment_id,
                "Kaspi QR payment created"
            ),
            Err(e) => tracing::error!(
                order_id = %request.order_id,
                error = %e,
                "Kaspi create_qr_payment failed"
            ),
        }
        result
    }

    async fn check_payment_status(
        &self,
        gateway_payment_id: &str,
    ) -> Result<GatewayPaymentStatus, GatewayError> {
        let body = self.signed_body([("payment_id", Value::from(gateway_payment_id))]);

        let result = self
            .post::<StatusReply>("status", &body, self.config.request_timeout())
            .await
            .and_then(StatusReply::into_status);

        if let Err(e) = &result {
            tracing::error!(
                gateway_payment_id,
                error = %e,
                "Kaspi check_payment_status failed"
            );
        }
        result
    }

    async fn cancel_payment(
        &self,
        gateway_payment_id: &str,
    ) -> Result<CancellationAck, GatewayError> {
        let body = self.signed_body([("payment_id", Value::from(gateway_payment_id))]);

        let result = self
            .post::<CancelReply>("cancel", &body, self.config.request_timeout())
            .await
            .and_then(CancelReply::into_ack);

        if let Err(e) = &result {
            tracing::error!(gateway_payment_id, error = %e, "Kaspi cancel_payment failed");
        }
        result
    }
}
