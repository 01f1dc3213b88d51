//! Response envelope and error mapping shared by every endpoint.
//!
//! Success: `{"success": true, "data": ..., "message"?: ...}`
//! Failure: `{"success": false, "error": ..., "error_code": ..., "details"?: ...}`
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Payment / package / subscription not found | 404 |
//! | Validation failed, gateway failure | 400 |
//! | Subscription inactive, expired, no sessions | 400 |
//! | Invalid webhook signature | 401 |
//! | Invalid state transition | 409 |
//! | Infrastructure | 500 |

use axum::extract::rejection::JsonRejection;
use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::ErrorCode;
use crate::domain::payment::PaymentError;
use crate::domain::subscription::SubscriptionError;

// ════════════════════════════════════════════════════════════════════════════════
// Envelopes
// ════════════════════════════════════════════════════════════════════════════════

/// Success envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    /// `{"success": true}` with nothing else.
    pub fn acknowledged() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
        }
    }
}

/// Failure envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            error_code: error_code.into(),
            details: None,
        }
    }

    pub fn with_details(
        error_code: impl Into<String>,
        error: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(error_code, error)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════════

/// API error that renders as the failure envelope.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: ErrorCode,
    message: String,
    details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Same error, different status.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        let status = match &err {
            PaymentError::NotFound(_) | PaymentError::PackageNotFound(_) => StatusCode::NOT_FOUND,
            PaymentError::InvalidState { .. } => StatusCode::CONFLICT,
            PaymentError::Gateway { .. } => StatusCode::BAD_REQUEST,
            PaymentError::InvalidWebhookSignature => StatusCode::UNAUTHORIZED,
            PaymentError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            PaymentError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let api_error = ApiError::new(status, err.code(), err.message());
        match err {
            PaymentError::ValidationFailed { field, .. } => {
                api_error.with_details(serde_json::json!({ "field": field }))
            }
            _ => api_error,
        }
    }
}

impl From<SubscriptionError> for ApiError {
    fn from(err: SubscriptionError) -> Self {
        let status = match &err {
            SubscriptionError::NotFound(_) => StatusCode::NOT_FOUND,
            SubscriptionError::Inactive(_)
            | SubscriptionError::Expired(_)
            | SubscriptionError::NoSessionsRemaining => StatusCode::BAD_REQUEST,
            SubscriptionError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, err.code(), err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            ErrorCode::ValidationFailed,
            rejection.body_text(),
        )
    }
}

/// What clients see for any 5xx.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Server-side detail stays in the logs.
        let message = if self.status.is_server_error() {
            tracing::error!(error_code = %self.code, error = %self.message, "Request failed");
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.message
        };

        let body = match self.details {
            Some(details) => ErrorResponse::with_details(self.code.to_string(), message, details),
            None => ErrorResponse::new(self.code.to_string(), message),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{PaymentId, SubscriptionId};
    use crate::domain::subscription::SubscriptionStatus;

    // ════════════════════════════════════════════════════════════════════════════
    // Envelope Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn acknowledged_serializes_success_only() {
        let json = serde_json::to_string(&ApiResponse::acknowledged()).unwrap();
        assert_eq!(json, r#"{"success":true}"#);
    }

    #[test]
    fn null_data_is_kept_when_explicit() {
        let response: ApiResponse<Option<u32>> =
            ApiResponse::ok_with_message(None, "No active subscription");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["data"], Value::Null);
        assert!(json.as_object().unwrap().contains_key("data"));
        assert_eq!(json["message"], "No active subscription");
    }

    /// Payload with no `Default`, as the API client decodes.
    #[derive(Debug, PartialEq, Deserialize)]
    struct Created {
        payment_id: String,
    }

    fn decode<R: serde::de::DeserializeOwned>(json: &str) -> ApiResponse<R> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn envelope_decodes_payload_without_default() {
        let response: ApiResponse<Created> =
            decode(r#"{"success":true,"data":{"payment_id":"pay-1"}}"#);
        assert_eq!(
            response.data,
            Some(Created {
                payment_id: "pay-1".to_string()
            })
        );

        let empty: ApiResponse<Created> = decode(r#"{"success":true,"message":"Cancelled"}"#);
        assert!(empty.data.is_none());
        assert_eq!(empty.message.as_deref(), Some("Cancelled"));
    }

    #[test]
    fn error_response_omits_missing_details() {
        let json = serde_json::to_string(&ErrorResponse::new("NOT_FOUND", "Not found")).unwrap();
        assert!(json.contains(r#""success":false"#));
        assert!(!json.contains("details"));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Error Mapping Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn payment_not_found_maps_to_404() {
        let err = ApiError::from(PaymentError::not_found(PaymentId::new()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), ErrorCode::PaymentNotFound);
    }

    #[test]
    fn package_not_found_maps_to_404() {
        let err = ApiError::from(PaymentError::package_not_found("gold"));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_state_maps_to_409() {
        let err = ApiError::from(PaymentError::invalid_state("completed", "cancelled"));
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn gateway_failure_maps_to_400() {
        let err = ApiError::from(PaymentError::gateway("Failed to create QR code"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Failed to create QR code");
    }

    #[test]
    fn invalid_signature_maps_to_401() {
        let err = ApiError::from(PaymentError::invalid_webhook_signature());
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn validation_failure_carries_field() {
        let err = ApiError::from(PaymentError::validation("client_phone", "bad"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.details, Some(serde_json::json!({"field": "client_phone"})));
    }

    #[test]
    fn infrastructure_maps_to_500() {
        let err = ApiError::from(PaymentError::infrastructure("lock poisoned"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn server_errors_hide_internal_detail() {
        let response = ApiError::from(PaymentError::infrastructure("lock poisoned")).into_response();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, INTERNAL_ERROR_MESSAGE);
        assert_eq!(body.error_code, "DATABASE_ERROR");
    }

    #[test]
    fn subscription_errors_map_to_status() {
        assert_eq!(
            ApiError::from(SubscriptionError::NotFound(SubscriptionId::new())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(SubscriptionError::Inactive(SubscriptionStatus::Cancelled)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(SubscriptionError::NoSessionsRemaining).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
