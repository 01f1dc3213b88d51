//! HTTP handlers for subscription endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::subscription::{
    GetActiveSubscriptionQuery, GetActiveSubscriptionResult, GetPackageHistoryQuery,
    UseSessionCommand,
};
use crate::domain::foundation::{ClientId, ErrorCode, SubscriptionId};
use crate::domain::payment::PaymentError;

use super::super::response::{ApiError, ApiResponse};
use super::super::state::PaymentsAppState;
use super::dto::{ActiveSubscriptionResponse, PackagePurchaseResponse, SessionUsageResponse};

/// GET /api/v1/subscriptions/user/:client_id - Active subscription or null
pub async fn get_active_subscription(
    State(state): State<PaymentsAppState>,
    Path(client_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let query = GetActiveSubscriptionQuery {
        client_id: parse_client_id(client_id)?,
    };

    let response = match state.active_subscription_handler().handle(query).await? {
        GetActiveSubscriptionResult::Active {
            subscription,
            days_remaining,
        } => ApiResponse::ok(Some(ActiveSubscriptionResponse::new(
            subscription,
            days_remaining,
        ))),
        GetActiveSubscriptionResult::NoSubscription => {
            ApiResponse::ok_with_message(None, "No active subscription")
        }
        GetActiveSubscriptionResult::Expired(_) => {
            ApiResponse::ok_with_message(None, "Subscription has expired")
        }
    };

    Ok(Json(response))
}

/// POST /api/v1/subscriptions/:subscription_id/use-session - Book a session
pub async fn use_session(
    State(state): State<PaymentsAppState>,
    Path(subscription_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let subscription_id: SubscriptionId = subscription_id.parse().map_err(|_| {
        ApiError::new(
            StatusCode::NOT_FOUND,
            ErrorCode::SubscriptionNotFound,
            format!("Subscription not found: {}", subscription_id),
        )
    })?;

    let subscription = state
        .use_session_handler()
        .handle(UseSessionCommand { subscription_id })
        .await?;

    Ok(Json(ApiResponse::ok_with_message(
        SessionUsageResponse::from(subscription),
        "Session used",
    )))
}

/// GET /api/v1/subscriptions/user/:client_id/history - Package purchases
pub async fn get_package_history(
    State(state): State<PaymentsAppState>,
    Path(client_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let query = GetPackageHistoryQuery {
        client_id: parse_client_id(client_id)?,
    };

    let history: Vec<PackagePurchaseResponse> = state
        .package_history_handler()
        .handle(query)
        .await?
        .into_iter()
        .map(PackagePurchaseResponse::from)
        .collect();

    Ok(Json(ApiResponse::ok(history)))
}

fn parse_client_id(raw: String) -> Result<ClientId, ApiError> {
    ClientId::new(raw).map_err(|e| ApiError::from(PaymentError::from(e)))
}
