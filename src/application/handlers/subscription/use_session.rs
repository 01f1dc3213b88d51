//! UseSessionHandler - Command handler for booking one training session.

use std::sync::Arc;

use crate::domain::foundation::{SubscriptionId, Timestamp};
use crate::domain::subscription::{Subscription, SubscriptionError};
use crate::ports::SubscriptionRepository;

/// Command to spend one session of a subscription.
#[derive(Debug, Clone)]
pub struct UseSessionCommand {
    pub subscription_id: SubscriptionId,
}

pub struct UseSessionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl UseSessionHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    /// Returns the subscription after the booking.
    ///
    /// A subscription found lapsed is persisted as expired before the
    /// `Expired` error is returned.
    pub async fn handle(&self, cmd: UseSessionCommand) -> Result<Subscription, SubscriptionError> {
        let mut subscription = self
            .subscriptions
            .find_by_id(&cmd.subscription_id)
            .await?
            .ok_or(SubscriptionError::NotFound(cmd.subscription_id))?;

        let now = Timestamp::now();
        match subscription.use_session(now) {
            Ok(()) => {}
            Err(SubscriptionError::Expired(id)) => {
                if subscription.refresh_expiry(now) {
                    self.subscriptions.update(&subscription).await?;
                }
                return Err(SubscriptionError::Expired(id));
            }
            Err(e) => return Err(e),
        }

        self.subscriptions.update(&subscription).await?;
        tracing::info!(
            subscription_id = %subscription.id,
            sessions_remaining = subscription.sessions_remaining,
            unlimited = subscription.is_unlimited,
            "Session booked"
        );
        Ok(subscription)
    }
}
