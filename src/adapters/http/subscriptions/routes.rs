//! Axum router configuration for subscription endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::PaymentsAppState;
use super::handlers::{get_active_subscription, get_package_history, use_session};

/// Create the subscriptions API router, mounted at `/api/v1/subscriptions`.
///
/// # Routes
///
/// - `GET /user/:client_id` - Active subscription of a client
/// - `GET /user/:client_id/history` - Package purchase history
/// - `POST /:subscription_id/use-session` - Book one session
pub fn subscription_routes() -> Router<PaymentsAppState> {
    Router::new()
        .route("/user/:client_id", get(get_active_subscription))
        .route("/user/:client_id/history", get(get_package_history))
        .route("/:subscription_id/use-session", post(use_session))
}
