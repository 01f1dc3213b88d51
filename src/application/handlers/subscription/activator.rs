//! SubscriptionActivator - credits a completed payment to the payer's subscription.
//!
//! This is the only place subscriptions are created or extended. Both the
//! status poll and the webhook call it when a payment transitions to
//! `completed`. A payment already in the active subscription's history is
//! not credited again.
//!
//! Not transactional: two payments completing at the same time for one
//! client may race between the lookup and the write.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, SubscriptionId, Timestamp};
use crate::domain::payment::Payment;
use crate::domain::subscription::Subscription;
use crate::ports::SubscriptionRepository;

/// What activation did to the client's subscriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// The client had no active subscription.
    Created(Subscription),

    /// The active subscription was extended.
    Extended(Subscription),

    /// The "active" subscription had lapsed; it was expired and replaced.
    Replaced {
        expired: SubscriptionId,
        subscription: Subscription,
    },

    /// The payment was credited earlier; nothing changed.
    AlreadyCredited(Subscription),
}

impl Activation {
    pub fn subscription(&self) -> &Subscription {
        match self {
            Activation::Created(s) | Activation::Extended(s) | Activation::AlreadyCredited(s) => s,
            Activation::Replaced { subscription, .. } => subscription,
        }
    }
}

pub struct SubscriptionActivator {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl SubscriptionActivator {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    /// Credit `payment`'s package to its payer.
    pub async fn activate(&self, payment: &Payment) -> Result<Activation, DomainError> {
        let now = Timestamp::now();
        let client_id = &payment.payer.client_id;

        let existing = self.subscriptions.find_active_by_client(client_id).await?;

        let activation = match existing {
            Some(current) if current.credited_by(&payment.id) => {
                tracing::info!(
                    payment_id = %payment.id,
                    subscription_id = %current.id,
                    "Payment already credited"
                );
                return Ok(Activation::AlreadyCredited(current));
            }
            Some(mut current) => {
                if current.refresh_expiry(now) {
                    self.subscriptions.update(&current).await?;
                    let subscription = Subscription::activate(
                        client_id.clone(),
                        &payment.package,
                        Some(payment.id),
                        now,
                    );
                    self.subscriptions.save(&subscription).await?;
                    Activation::Replaced {
                        expired: current.id,
                        subscription,
                    }
                } else {
                    current.extend(&payment.package, Some(payment.id), now)?;
                    self.subscriptions.update(&current).await?;
                    Activation::Extended(current)
                }
            }
            None => {
                let subscription =
                    Subscription::activate(client_id.clone(), &payment.package, Some(payment.id), now);
                self.subscriptions.save(&subscription).await?;
                Activation::Created(subscription)
            }
        };

        let subscription = activation.subscription();
        tracing::info!(
            payment_id = %payment.id,
            client_id = %client_id,
            subscription_id = %subscription.id,
            sessions_remaining = subscription.sessions_remaining,
            expires_at = %subscription.expires_at.as_datetime(),
            "Subscription credited"
        );

        Ok(activation)
    }
}
