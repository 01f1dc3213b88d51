//! Checkout backend port.
//!
//! What the checkout orchestrator needs from the payments service: start a
//! Kaspi payment, poll it, cancel it. Implemented over HTTP against the
//! REST API, or in-process against the application handlers.

use crate::domain::foundation::Timestamp;
use crate::domain::payment::PaymentStatus;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[async_trait]
pub trait CheckoutBackend: Send + Sync {
    async fn create_payment(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CreatedPayment, BackendError>;

    async fn payment_status(&self, payment_id: &str) -> Result<PaymentStatusReport, BackendError>;

    async fn cancel_payment(&self, payment_id: &str) -> Result<(), BackendError>;
}

/// Who buys which package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub package_id: String,
    pub client_id: String,
    pub client_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
}

/// A payment the service created and the gateway issued a QR for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedPayment {
    pub payment_id: String,
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub package_name: String,
    pub qr_code: String,
    pub qr_image: Option<String>,
    pub deeplink: Option<String>,
    pub expires_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStatusReport {
    pub payment_id: String,
    pub status: PaymentStatus,
    pub amount: i64,
    pub currency: String,
    pub completed_at: Option<Timestamp>,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The service answered with an error envelope.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The service could not be reached or answered garbage.
    #[error("Payments service unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    /// Message suitable for the payer.
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Rejected { message, .. } => message.clone(),
            BackendError::Unavailable(_) => "Payment could not be created".to_string(),
        }
    }
}
