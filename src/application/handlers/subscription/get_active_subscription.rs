//! GetActiveSubscriptionHandler - Query handler for a client's current subscription.

use std::sync::Arc;

use crate::domain::foundation::{ClientId, Timestamp};
use crate::domain::subscription::{Subscription, SubscriptionError};
use crate::ports::SubscriptionRepository;

/// Query for the active subscription of a client.
#[derive(Debug, Clone)]
pub struct GetActiveSubscriptionQuery {
    pub client_id: ClientId,
}

/// Result of the lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetActiveSubscriptionResult {
    Active {
        subscription: Subscription,
        days_remaining: i64,
    },

    /// The client never subscribed, or every subscription has ended.
    NoSubscription,

    /// The subscription had lapsed and was just marked expired.
    Expired(Subscription),
}

pub struct GetActiveSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl GetActiveSubscriptionHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    pub async fn handle(
        &self,
        query: GetActiveSubscriptionQuery,
    ) -> Result<GetActiveSubscriptionResult, SubscriptionError> {
        let Some(mut subscription) = self
            .subscriptions
            .find_active_by_client(&query.client_id)
            .await?
        else {
            return Ok(GetActiveSubscriptionResult::NoSubscription);
        };

        let now = Timestamp::now();
        if subscription.refresh_expiry(now) {
            self.subscriptions.update(&subscription).await?;
            tracing::info!(
                subscription_id = %subscription.id,
                client_id = %query.client_id,
                "Subscription expired"
            );
            return Ok(GetActiveSubscriptionResult::Expired(subscription));
        }

        let days_remaining = subscription.days_remaining(now);
        Ok(GetActiveSubscriptionResult::Active {
            subscription,
            days_remaining,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySubscriptionRepository;
    use crate::domain::payment::PackageCatalog;
    use crate::domain::subscription::SubscriptionStatus;

    fn client() -> ClientId {
        ClientId::new("client-1").unwrap()
    }

    fn subscription(activated_at: Timestamp) -> Subscription {
        let package = PackageCatalog::standard().find("standard").unwrap();
        Subscription::activate(client(), package, None, activated_at)
    }

    #[tokio::test]
    async fn returns_active_subscription_with_days_remaining() {
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        let sub = subscription(Timestamp::now().minus_days(10));
        repo.save(&sub).await.unwrap();
        let handler = GetActiveSubscriptionHandler::new(repo);

        let result = handler
            .handle(GetActiveSubscriptionQuery { client_id: client() })
            .await
            .unwrap();

        match result {
            GetActiveSubscriptionResult::Active {
                subscription,
                days_remaining,
            } => {
                assert_eq!(subscription.id, sub.id);
                assert_eq!(days_remaining, 20);
            }
            other => panic!("expected Active, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn no_subscription_for_unknown_client() {
        let handler =
            GetActiveSubscriptionHandler::new(Arc::new(InMemorySubscriptionRepository::new()));

        let result = handler
            .handle(GetActiveSubscriptionQuery { client_id: client() })
            .await
            .unwrap();

        assert_eq!(result, GetActiveSubscriptionResult::NoSubscription);
    }

    #[tokio::test]
    async fn lapsed_subscription_is_marked_expired() {
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        let sub = subscription(Timestamp::now().minus_days(31));
        repo.save(&sub).await.unwrap();
        let handler = GetActiveSubscriptionHandler::new(repo.clone());

        let result = handler
            .handle(GetActiveSubscriptionQuery { client_id: client() })
            .await
            .unwrap();

        assert!(matches!(result, GetActiveSubscriptionResult::Expired(_)));
        let stored = repo.find_by_id(&sub.id).await.unwrap().unwrap();
        assert_eq!(stored.status, SubscriptionStatus::Expired);
    }
}
