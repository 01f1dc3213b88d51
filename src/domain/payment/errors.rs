//! Payment-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | PackageNotFound | 404 |
//! | InvalidState | 409 (400 for cancellation) |
//! | Gateway | 400 |
//! | InvalidWebhookSignature | 401 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, PaymentId, ValidationError};

/// Payment-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// Payment was not found.
    NotFound(PaymentId),

    /// Requested package is not in the catalog.
    PackageNotFound(String),

    /// The payment's status forbids the operation.
    InvalidState {
        current: String,
        attempted: String,
    },

    /// The gateway refused the request or could not be reached.
    Gateway { message: String },

    /// Webhook signature verification failed.
    InvalidWebhookSignature,

    /// Input validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl PaymentError {
    pub fn not_found(id: PaymentId) -> Self {
        PaymentError::NotFound(id)
    }

    pub fn package_not_found(id: impl Into<String>) -> Self {
        PaymentError::PackageNotFound(id.into())
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        PaymentError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn gateway(message: impl Into<String>) -> Self {
        PaymentError::Gateway {
            message: message.into(),
        }
    }

    pub fn invalid_webhook_signature() -> Self {
        PaymentError::InvalidWebhookSignature
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        PaymentError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PaymentError::NotFound(_) => ErrorCode::PaymentNotFound,
            PaymentError::PackageNotFound(_) => ErrorCode::PackageNotFound,
            PaymentError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            PaymentError::Gateway { .. } => ErrorCode::GatewayError,
            PaymentError::InvalidWebhookSignature => ErrorCode::InvalidWebhookSignature,
            PaymentError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            PaymentError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            PaymentError::NotFound(id) => format!("Payment not found: {}", id),
            PaymentError::PackageNotFound(id) => format!("Package not found: {}", id),
            PaymentError::InvalidState { current, attempted } => {
                format!("Payment cannot be {} in {} state", attempted, current)
            }
            PaymentError::Gateway { message } => message.clone(),
            PaymentError::InvalidWebhookSignature => "Invalid webhook signature".to_string(),
            PaymentError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            PaymentError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for PaymentError {}

impl From<ValidationError> for PaymentError {
    fn from(err: ValidationError) -> Self {
        PaymentError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for PaymentError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::InvalidStateTransition => PaymentError::InvalidState {
                current: err
                    .details
                    .get("current")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                attempted: err
                    .details
                    .get("attempted")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
            },
            ErrorCode::ValidationFailed => PaymentError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => PaymentError::Infrastructure(err.to_string()),
        }
    }
}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_payment_not_found() {
        let id = PaymentId::new();
        let err = PaymentError::not_found(id);
        assert_eq!(err.code(), ErrorCode::PaymentNotFound);
        assert_eq!(err.message(), format!("Payment not found: {}", id));
    }

    #[test]
    fn gateway_error_passes_message_through() {
        let err = PaymentError::gateway("Merchant is blocked");
        assert_eq!(err.code(), ErrorCode::GatewayError);
        assert_eq!(err.to_string(), "Merchant is blocked");
    }

    #[test]
    fn invalid_state_message_names_both_states() {
        let err = PaymentError::invalid_state("completed", "cancelled");
        assert_eq!(err.message(), "Payment cannot be cancelled in completed state");
    }

    #[test]
    fn from_domain_transition_error_keeps_states() {
        let domain = DomainError::new(ErrorCode::InvalidStateTransition, "nope")
            .with_detail("current", "failed")
            .with_detail("attempted", "completed");

        let err: PaymentError = domain.into();

        assert_eq!(err, PaymentError::invalid_state("failed", "completed"));
    }

    #[test]
    fn from_validation_error_keeps_field() {
        let err: PaymentError = ValidationError::empty_field("client_name").into();
        assert!(matches!(
            err,
            PaymentError::ValidationFailed { ref field, .. } if field == "client_name"
        ));
    }

    #[test]
    fn unknown_domain_code_becomes_infrastructure() {
        let err: PaymentError = DomainError::new(ErrorCode::DatabaseError, "disk full").into();
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }
}
