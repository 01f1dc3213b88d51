//! Payment gateway port.
//!
//! Contract for the external processor that issues QR payments and reports
//! their status (Kaspi in production, a mock in tests).
//!
//! # Design
//!
//! - **Signed requests**: implementations sign every outbound call
//! - **Normalized failures**: transport and gateway refusals both surface as
//!   `GatewayError` with a human message
//! - **No automatic retries**: callers decide what to do on failure

use crate::domain::foundation::{ClientId, OrderId, Timestamp};
use crate::domain::payment::{PaymentStatus, QrCheckout};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for QR payment gateways.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Ask the gateway to issue a QR payment.
    async fn create_qr_payment(
        &self,
        request: CreateQrPaymentRequest,
    ) -> Result<QrCheckout, GatewayError>;

    /// Query the gateway for the current status of a payment.
    async fn check_payment_status(
        &self,
        gateway_payment_id: &str,
    ) -> Result<GatewayPaymentStatus, GatewayError>;

    /// Cancel a payment at the gateway.
    ///
    /// `Ok` carries the gateway's confirmation message, if any.
    async fn cancel_payment(
        &self,
        gateway_payment_id: &str,
    ) -> Result<CancellationAck, GatewayError>;
}

// ════════════════════════════════════════════════════════════════════════════════
// Request/Response Types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateQrPaymentRequest {
    pub amount: i64,
    pub currency: String,
    pub order_id: OrderId,
    pub description: String,
    pub client_id: ClientId,
}

/// Status as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayPaymentStatus {
    pub status: PaymentStatus,
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub order_id: Option<String>,
    pub transaction_id: Option<String>,
    pub paid_at: Option<Timestamp>,
}

impl GatewayPaymentStatus {
    /// Bare status with no settlement details.
    pub fn with_status(status: PaymentStatus) -> Self {
        Self {
            status,
            amount: None,
            currency: None,
            order_id: None,
            transaction_id: None,
            paid_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CancellationAck {
    pub message: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════════

/// Gateway error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayErrorCode {
    /// Could not reach the gateway.
    NetworkError,
    /// The gateway did not answer in time.
    Timeout,
    /// The gateway answered with a non-success status.
    Rejected,
    /// The gateway's reply could not be understood.
    InvalidResponse,
}

impl std::fmt::Display for GatewayErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GatewayErrorCode::NetworkError => "network_error",
            GatewayErrorCode::Timeout => "timeout",
            GatewayErrorCode::Rejected => "rejected",
            GatewayErrorCode::InvalidResponse => "invalid_response",
        };
        write!(f, "{}", s)
    }
}

/// Normalized gateway failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    pub code: GatewayErrorCode,

    /// Human-readable message, safe to show to the payer.
    pub message: String,

    /// Gateway's own error code, if it sent one.
    pub provider_code: Option<String>,
}

impl GatewayError {
    pub fn new(code: GatewayErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::NetworkError, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::Timeout, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::Rejected, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::InvalidResponse, message)
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for GatewayError {}
