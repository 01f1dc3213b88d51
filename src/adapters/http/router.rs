//! Top-level router: API routes, health check and middleware.

use axum::extract::Json;
use axum::http::{HeaderValue, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::domain::foundation::{ErrorCode, Timestamp};

use super::payments::payment_routes;
use super::response::ApiError;
use super::state::PaymentsAppState;
use super::subscriptions::subscription_routes;

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: Timestamp,
    pub version: String,
}

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Timestamp::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fallback for unknown routes; echoes the path back.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::new(
        StatusCode::NOT_FOUND,
        ErrorCode::EndpointNotFound,
        "Endpoint not found",
    )
    .with_details(serde_json::json!({ "path": uri.path() }))
}

/// API routes without middleware.
///
/// ```ignore
/// let app = api_router().with_state(state);
/// ```
pub fn api_router() -> Router<PaymentsAppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1/payments", payment_routes())
        .nest("/api/v1/subscriptions", subscription_routes())
        .fallback(not_found)
}

/// The full application: routes, state, tracing, CORS and request timeout.
pub fn app_router(state: PaymentsAppState, server: &ServerConfig) -> Router {
    api_router()
        .with_state(state)
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
}

/// Configured origins, or anything in development when none are set.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() && !server.is_production() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
