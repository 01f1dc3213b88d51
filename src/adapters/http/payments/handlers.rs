//! HTTP handlers for payment endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::application::handlers::payment::{
    CancelPaymentCommand, CheckPaymentStatusQuery, HandleKaspiWebhookCommand,
    HandleKaspiWebhookResult, ListClientPaymentsQuery,
};
use crate::domain::foundation::{ClientId, ErrorCode, PaymentId};
use crate::domain::payment::{PaymentError, SIGNATURE_HEADER};

use super::super::response::{ApiError, ApiResponse};
use super::super::state::PaymentsAppState;
use super::dto::{
    CancelPaymentResponse, ClientPaymentResponse, CreatePaymentRequest, CreatePaymentResponse,
    PaymentStatusResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/v1/payments/packages - List purchasable packages
pub async fn list_packages(State(state): State<PaymentsAppState>) -> impl IntoResponse {
    let packages = state.list_packages_handler().handle();
    Json(ApiResponse::ok(packages))
}

/// GET /api/v1/payments/:payment_id/status - Poll Kaspi for the payment status
pub async fn get_payment_status(
    State(state): State<PaymentsAppState>,
    Path(payment_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let query = CheckPaymentStatusQuery {
        payment_id: parse_payment_id(&payment_id)?,
    };

    let payment = state.check_payment_status_handler().handle(query).await?;

    Ok(Json(ApiResponse::ok(PaymentStatusResponse::from(payment))))
}

/// GET /api/v1/payments/user/:client_id - Payment history, newest first
pub async fn list_client_payments(
    State(state): State<PaymentsAppState>,
    Path(client_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let query = ListClientPaymentsQuery {
        client_id: ClientId::new(client_id).map_err(PaymentError::from)?,
    };

    let payments = state.list_client_payments_handler().handle(query).await?;

    let response: Vec<ClientPaymentResponse> =
        payments.into_iter().map(ClientPaymentResponse::from).collect();
    Ok(Json(ApiResponse::ok(response)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/payments/create - Start a Kaspi QR payment
pub async fn create_payment(
    State(state): State<PaymentsAppState>,
    body: Result<Json<CreatePaymentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body?;

    let payment = state.create_payment_handler().handle(request.into()).await?;

    Ok(Json(ApiResponse::ok(CreatePaymentResponse::from(payment))))
}

/// POST /api/v1/payments/:payment_id/cancel - Cancel a pending payment
///
/// Cancelling a payment that already settled is a bad request here rather
/// than a conflict.
pub async fn cancel_payment(
    State(state): State<PaymentsAppState>,
    Path(payment_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = CancelPaymentCommand {
        payment_id: parse_payment_id(&payment_id)?,
    };

    let result = state
        .cancel_payment_handler()
        .handle(cmd)
        .await
        .map_err(|e| match e {
            PaymentError::InvalidState { .. } => {
                ApiError::from(e).with_status(StatusCode::BAD_REQUEST)
            }
            other => ApiError::from(other),
        })?;

    let message = result
        .gateway_message
        .unwrap_or_else(|| "Payment cancelled".to_string());
    Ok(Json(ApiResponse::ok_with_message(
        CancelPaymentResponse::from(result.payment),
        message,
    )))
}

/// POST /api/v1/payments/webhook - Kaspi status notification
///
/// Any authenticated notification is acknowledged, even when it could not be
/// applied, so Kaspi stops retrying it.
pub async fn handle_kaspi_webhook(
    State(state): State<PaymentsAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = HandleKaspiWebhookCommand {
        payload: body.to_vec(),
        signature,
    };

    match state.webhook_handler().handle(cmd).await? {
        HandleKaspiWebhookResult::Applied { payment_id, from, to } => {
            tracing::info!(payment_id = %payment_id, from = %from, to = %to, "Webhook applied");
        }
        HandleKaspiWebhookResult::Unchanged { payment_id } => {
            tracing::debug!(payment_id = %payment_id, "Webhook repeated a known status");
        }
        HandleKaspiWebhookResult::UnknownPayment { .. } | HandleKaspiWebhookResult::Ignored { .. } => {}
    }

    Ok(Json(ApiResponse::acknowledged()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════════

/// A malformed id cannot name a stored payment.
fn parse_payment_id(raw: &str) -> Result<PaymentId, ApiError> {
    raw.parse().map_err(|_| {
        ApiError::new(
            StatusCode::NOT_FOUND,
            ErrorCode::PaymentNotFound,
            format!("Payment not found: {}", raw),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::adapters::kaspi::MockPaymentGateway;
    use crate::adapters::memory::{InMemoryPaymentRepository, InMemorySubscriptionRepository};
    use crate::domain::payment::test_support::pending_payment;
    use crate::domain::payment::{KaspiWebhookVerifier, PackageCatalog, PayloadSigner, PaymentStatus};
    use crate::ports::PaymentRepository;
    use secrecy::SecretString;

    struct Fixture {
        payments: Arc<InMemoryPaymentRepository>,
        gateway: Arc<MockPaymentGateway>,
        state: PaymentsAppState,
    }

    fn fixture() -> Fixture {
        let payments = Arc::new(InMemoryPaymentRepository::new());
        let gateway = Arc::new(MockPaymentGateway::new());
        let state = PaymentsAppState::new(
            payments.clone(),
            Arc::new(InMemorySubscriptionRepository::new()),
            gateway.clone(),
            Arc::new(PackageCatalog::standard().clone()),
            KaspiWebhookVerifier::new(PayloadSigner::new(SecretString::new(
                "secret".to_string(),
            ))),
        );
        Fixture {
            payments,
            gateway,
            state,
        }
    }

    #[tokio::test]
    async fn create_payment_returns_qr() {
        let f = fixture();
        let request = CreatePaymentRequest {
            package_id: "basic".to_string(),
            client_id: "client-1".to_string(),
            client_name: "Aigerim".to_string(),
            ..Default::default()
        };

        let result = create_payment(State(f.state), Ok(Json(request))).await;

        assert!(result.is_ok());
        assert!(f.gateway.was_called("create_qr_payment"));
    }

    #[tokio::test]
    async fn create_payment_rejects_missing_name() {
        let f = fixture();
        let request = CreatePaymentRequest {
            package_id: "basic".to_string(),
            client_id: "client-1".to_string(),
            ..Default::default()
        };

        let err = create_payment(State(f.state), Ok(Json(request)))
            .await
            .err()
            .unwrap();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert!(!f.gateway.was_called("create_qr_payment"));
    }

    #[tokio::test]
    async fn malformed_payment_id_is_not_found() {
        let f = fixture();

        let err = get_payment_status(State(f.state), Path("not-a-uuid".to_string()))
            .await
            .err()
            .unwrap();

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cancelling_settled_payment_is_bad_request() {
        let f = fixture();
        let mut payment = pending_payment("basic", "client-1", "kaspi-1");
        payment
            .reconcile(PaymentStatus::Failed, None, None)
            .unwrap();
        f.payments.save(&payment).await.unwrap();

        let err = cancel_payment(State(f.state), Path(payment.id.to_string()))
            .await
            .err()
            .unwrap();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
        assert!(!f.gateway.was_called("cancel_payment"));
    }

    #[tokio::test]
    async fn webhook_without_signature_is_unauthorized() {
        let f = fixture();

        let err = handle_kaspi_webhook(
            State(f.state),
            HeaderMap::new(),
            Bytes::from_static(br#"{"payment_id":"kaspi-1","status":"completed"}"#),
        )
        .await
        .err()
        .unwrap();

        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }
}
