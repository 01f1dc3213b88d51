//! REST client for the payments API.
//!
//! Implements the `CheckoutBackend` port over HTTP, for checkouts running in
//! a different process from the payments service.
//!
//! ```ignore
//! let backend = PaymentsApiClient::new("http://localhost:4000");
//! let orchestrator = CheckoutOrchestrator::new(Arc::new(backend), processor, config);
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::adapters::http::payments::{
    CancelPaymentResponse, CreatePaymentRequest, CreatePaymentResponse, PaymentStatusResponse,
};
use crate::adapters::http::{ApiResponse, ErrorResponse};
use crate::ports::{
    BackendError, CheckoutBackend, CheckoutRequest, CreatedPayment, PaymentStatusReport,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for `/api/v1/payments`.
#[derive(Debug, Clone)]
pub struct PaymentsApiClient {
    base_url: String,
    http_client: reqwest::Client,
    timeout: Duration,
}

impl PaymentsApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v1/payments/{}", self.base_url, path)
    }

    /// Send a request and unwrap the success envelope.
    async fn send<R: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<R, BackendError> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(rejection(status, &text));
        }

        let envelope: ApiResponse<R> = serde_json::from_str(&text)
            .map_err(|e| BackendError::Unavailable(format!("Unexpected response: {}", e)))?;
        envelope
            .data
            .ok_or_else(|| BackendError::Unavailable("Response carried no data".to_string()))
    }
}

fn rejection(status: StatusCode, body: &str) -> BackendError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| format!("Payments API error: HTTP {}", status.as_u16()));
    BackendError::Rejected {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl CheckoutBackend for PaymentsApiClient {
    async fn create_payment(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CreatedPayment, BackendError> {
        let body = CreatePaymentRequest {
            package_id: request.package_id.clone(),
            client_id: request.client_id.clone(),
            client_name: request.client_name.clone(),
            client_phone: request.client_phone.clone(),
            client_email: request.client_email.clone(),
        };

        let created: CreatePaymentResponse = self
            .send(self.http_client.post(self.endpoint("create")).json(&body))
            .await?;

        Ok(CreatedPayment {
            payment_id: created.payment_id,
            order_id: created.order_id,
            amount: created.amount,
            currency: created.currency,
            package_name: created.package.name,
            qr_code: created.qr_code,
            qr_image: created.qr_image,
            deeplink: created.deeplink,
            expires_at: created.expires_at,
        })
    }

    async fn payment_status(&self, payment_id: &str) -> Result<PaymentStatusReport, BackendError> {
        let status: PaymentStatusResponse = self
            .send(
                self.http_client
                    .get(self.endpoint(&format!("{}/status", payment_id))),
            )
            .await?;

        Ok(PaymentStatusReport {
            payment_id: status.payment_id,
            status: status.status,
            amount: status.amount,
            currency: status.currency,
            completed_at: status.completed_at,
            transaction_id: status.transaction_id,
        })
    }

    async fn cancel_payment(&self, payment_id: &str) -> Result<(), BackendError> {
        let _: CancelPaymentResponse = self
            .send(
                self.http_client
                    .post(self.endpoint(&format!("{}/cancel", payment_id))),
            )
            .await?;
        Ok(())
    }
}
