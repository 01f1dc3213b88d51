//! Axum router configuration for payment endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::PaymentsAppState;
use super::handlers::{
    cancel_payment, create_payment, get_payment_status, handle_kaspi_webhook,
    list_client_payments, list_packages,
};

/// Create the payments API router, mounted at `/api/v1/payments`.
///
/// # Routes
///
/// - `GET /packages` - Package catalog
/// - `POST /create` - Start a Kaspi QR payment
/// - `GET /:payment_id/status` - Poll the payment status
/// - `POST /:payment_id/cancel` - Cancel a pending payment
/// - `GET /user/:client_id` - Payment history of a client
///
/// ## Webhook Endpoints (no auth, signature verified)
/// - `POST /webhook` - Kaspi status notifications
pub fn payment_routes() -> Router<PaymentsAppState> {
    Router::new()
        .route("/packages", get(list_packages))
        .route("/create", post(create_payment))
        .route("/:payment_id/status", get(get_payment_status))
        .route("/:payment_id/cancel", post(cancel_payment))
        .route("/user/:client_id", get(list_client_payments))
        .route("/webhook", post(handle_kaspi_webhook))
}
