//! HTTP DTOs (Data Transfer Objects) for payment endpoints.
//!
//! Request bodies use camelCase (snake_case accepted too); responses use
//! snake_case.

use serde::{Deserialize, Serialize};

use crate::application::handlers::payment::CreatePaymentCommand;
use crate::domain::foundation::Timestamp;
use crate::domain::payment::{Payment, PaymentStatus, TrainingPackage};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to buy a package.
///
/// Missing fields deserialize as empty so that validation reports them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    #[serde(default, alias = "package_id")]
    pub package_id: String,
    #[serde(default, alias = "client_id")]
    pub client_id: String,
    #[serde(default, alias = "client_name")]
    pub client_name: String,
    #[serde(default, alias = "client_phone", skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    #[serde(default, alias = "client_email", skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
}

impl From<CreatePaymentRequest> for CreatePaymentCommand {
    fn from(request: CreatePaymentRequest) -> Self {
        Self {
            package_id: request.package_id,
            client_id: request.client_id,
            client_name: request.client_name,
            client_phone: request.client_phone,
            client_email: request.client_email,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// A freshly created payment with its QR code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePaymentResponse {
    pub payment_id: String,
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub package: TrainingPackage,
    pub qr_code: String,
    pub qr_image: Option<String>,
    pub deeplink: Option<String>,
    pub expires_at: Option<Timestamp>,
}

impl From<Payment> for CreatePaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            payment_id: payment.id.to_string(),
            order_id: payment.order_id.to_string(),
            amount: payment.amount,
            currency: payment.currency,
            package: payment.package,
            qr_code: payment.qr_code,
            qr_image: payment.qr_image,
            deeplink: payment.deeplink,
            expires_at: payment.expires_at,
        }
    }
}

/// Current status of a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStatusResponse {
    pub payment_id: String,
    pub status: PaymentStatus,
    pub amount: i64,
    pub currency: String,
    pub completed_at: Option<Timestamp>,
    pub transaction_id: Option<String>,
}

impl From<Payment> for PaymentStatusResponse {
    fn from(payment: Payment) -> Self {
        Self {
            payment_id: payment.id.to_string(),
            status: payment.status,
            amount: payment.amount,
            currency: payment.currency,
            completed_at: payment.completed_at,
            transaction_id: payment.transaction_id,
        }
    }
}

/// Outcome of a cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelPaymentResponse {
    pub payment_id: String,
    pub status: PaymentStatus,
    pub cancelled_at: Option<Timestamp>,
}

impl From<Payment> for CancelPaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            payment_id: payment.id.to_string(),
            status: payment.status,
            cancelled_at: payment.cancelled_at,
        }
    }
}

/// One entry in a client's payment history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPaymentResponse {
    pub id: String,
    pub order_id: String,
    pub package: TrainingPackage,
    pub amount: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
}

impl From<Payment> for ClientPaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id.to_string(),
            order_id: payment.order_id.to_string(),
            package: payment.package,
            amount: payment.amount,
            currency: payment.currency,
            status: payment.status,
            created_at: payment.created_at,
            completed_at: payment.completed_at,
            expires_at: payment.expires_at,
        }
    }
}
