//! HTTP DTOs for subscription endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::payment::SessionAllowance;
use crate::domain::subscription::{PackagePurchase, Subscription, SubscriptionStatus};

/// Active subscription of a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSubscriptionResponse {
    pub id: String,
    pub package_id: String,
    pub package_name: String,
    pub status: SubscriptionStatus,
    pub sessions_remaining: u32,
    pub is_unlimited: bool,
    pub activated_at: Timestamp,
    pub expires_at: Timestamp,
    /// Whole days left, rounded up.
    pub days_remaining: i64,
}

impl ActiveSubscriptionResponse {
    pub fn new(subscription: Subscription, days_remaining: i64) -> Self {
        Self {
            id: subscription.id.to_string(),
            package_id: subscription.package_id.to_string(),
            package_name: subscription.package_name,
            status: subscription.status,
            sessions_remaining: subscription.sessions_remaining,
            is_unlimited: subscription.is_unlimited,
            activated_at: subscription.activated_at,
            expires_at: subscription.expires_at,
            days_remaining,
        }
    }
}

/// Balance after a booked session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUsageResponse {
    pub sessions_remaining: u32,
    pub is_unlimited: bool,
}

impl From<Subscription> for SessionUsageResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            sessions_remaining: subscription.sessions_remaining,
            is_unlimited: subscription.is_unlimited,
        }
    }
}

/// One package purchase. `sessions` is `-1` for unlimited packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagePurchaseResponse {
    pub package_id: String,
    pub purchased_at: Timestamp,
    pub sessions: SessionAllowance,
}

impl From<PackagePurchase> for PackagePurchaseResponse {
    fn from(purchase: PackagePurchase) -> Self {
        Self {
            package_id: purchase.package_id.to_string(),
            purchased_at: purchase.purchased_at,
            sessions: purchase.sessions,
        }
    }
}
