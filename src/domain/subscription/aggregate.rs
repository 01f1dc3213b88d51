//! Subscription aggregate entity.
//!
//! A client holds at most one active subscription. Completed payments either
//! seed a new one or extend the active one; every purchase is appended to the
//! package history.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ClientId, DomainError, ErrorCode, PackageId, PaymentId, StateMachine, SubscriptionId,
    Timestamp,
};
use crate::domain::payment::{SessionAllowance, TrainingPackage};

use super::{SubscriptionError, SubscriptionStatus};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// One package purchase credited to a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagePurchase {
    pub package_id: PackageId,
    pub purchased_at: Timestamp,
    pub sessions: SessionAllowance,
    pub payment_id: Option<PaymentId>,
}

/// Subscription aggregate.
///
/// # Invariants
///
/// - `sessions_remaining` only grows through `activate`/`extend`
/// - `package_history` has one entry per credited payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub client_id: ClientId,
    pub package_id: PackageId,
    pub package_name: String,
    pub status: SubscriptionStatus,
    pub sessions_remaining: u32,
    pub is_unlimited: bool,
    pub activated_at: Timestamp,
    pub expires_at: Timestamp,
    pub package_history: Vec<PackagePurchase>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Subscription {
    /// Start a subscription from a first purchase.
    pub fn activate(
        client_id: ClientId,
        package: &TrainingPackage,
        payment_id: Option<PaymentId>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: SubscriptionId::new(),
            client_id,
            package_id: package.id.clone(),
            package_name: package.name.clone(),
            status: SubscriptionStatus::Active,
            sessions_remaining: package.sessions.credit(),
            is_unlimited: package.sessions.is_unlimited(),
            activated_at: now,
            expires_at: now.add_days(package.duration_days as i64),
            package_history: vec![purchase(package, payment_id, now)],
            created_at: now,
            updated_at: now,
        }
    }

    /// Credit another purchase to this subscription.
    ///
    /// Validity runs from the later of `now` and the current expiry, so
    /// renewing early never shortens paid time.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` unless the subscription is active.
    pub fn extend(
        &mut self,
        package: &TrainingPackage,
        payment_id: Option<PaymentId>,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        self.transition_to(SubscriptionStatus::Active)?;

        let base = if self.expires_at.is_after(&now) {
            self.expires_at
        } else {
            now
        };
        self.expires_at = base.add_days(package.duration_days as i64);
        self.sessions_remaining = self
            .sessions_remaining
            .saturating_add(package.sessions.credit());
        self.is_unlimited = self.is_unlimited || package.sessions.is_unlimited();
        self.package_history.push(purchase(package, payment_id, now));
        self.updated_at = now;
        Ok(())
    }

    /// True when `payment_id` is already in the package history.
    pub fn credited_by(&self, payment_id: &PaymentId) -> bool {
        self.package_history
            .iter()
            .any(|p| p.payment_id.as_ref() == Some(payment_id))
    }

    /// True once the validity window has passed.
    pub fn is_lapsed_at(&self, now: Timestamp) -> bool {
        self.expires_at.is_before(&now)
    }

    /// Mark an active subscription expired if its window has passed.
    ///
    /// Returns true when the status changed.
    pub fn refresh_expiry(&mut self, now: Timestamp) -> bool {
        if self.status == SubscriptionStatus::Active && self.is_lapsed_at(now) {
            self.status = SubscriptionStatus::Expired;
            self.updated_at = now;
            return true;
        }
        false
    }

    /// Book one session.
    ///
    /// Unlimited subscriptions never decrement.
    ///
    /// # Errors
    ///
    /// - `Inactive` - status is not active
    /// - `Expired` - window has passed (call `refresh_expiry` to persist it)
    /// - `NoSessionsRemaining` - limited subscription with a zero balance
    pub fn use_session(&mut self, now: Timestamp) -> Result<(), SubscriptionError> {
        if self.status != SubscriptionStatus::Active {
            return Err(SubscriptionError::Inactive(self.status));
        }
        if self.is_lapsed_at(now) {
            return Err(SubscriptionError::Expired(self.id));
        }
        if self.is_unlimited {
            return Ok(());
        }
        if self.sessions_remaining == 0 {
            return Err(SubscriptionError::NoSessionsRemaining);
        }
        self.sessions_remaining -= 1;
        self.updated_at = now;
        Ok(())
    }

    /// Whole days left, rounded up. Zero or negative once lapsed.
    pub fn days_remaining(&self, now: Timestamp) -> i64 {
        let secs = self.expires_at.duration_since(&now).num_seconds();
        if secs <= 0 {
            return secs.div_euclid(SECONDS_PER_DAY) + i64::from(secs % SECONDS_PER_DAY != 0);
        }
        (secs + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
    }

    fn transition_to(&mut self, target: SubscriptionStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Cannot transition subscription from {} to {}",
                    self.status, target
                ),
            )
        })?;
        Ok(())
    }
}

fn purchase(
    package: &TrainingPackage,
    payment_id: Option<PaymentId>,
    now: Timestamp,
) -> PackagePurchase {
    PackagePurchase {
        package_id: package.id.clone(),
        purchased_at: now,
        sessions: package.sessions,
        payment_id,
    }
}
