//! Subscription repository port.

use crate::domain::foundation::{ClientId, DomainError, SubscriptionId};
use crate::domain::subscription::Subscription;
use async_trait::async_trait;

/// Repository port for Subscription aggregate persistence.
///
/// Implementations must keep at most one `active` subscription per client;
/// callers expire the old one before saving a new one.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Save a new subscription.
    async fn save(&self, subscription: &Subscription) -> Result<(), DomainError>;

    /// Update an existing subscription.
    ///
    /// # Errors
    ///
    /// - `SubscriptionNotFound` if the subscription doesn't exist
    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, DomainError>;

    /// The client's subscription with status `active`, if any.
    ///
    /// Does not check `expires_at`; callers refresh expiry themselves.
    async fn find_active_by_client(
        &self,
        client_id: &ClientId,
    ) -> Result<Option<Subscription>, DomainError>;

    /// Every subscription the client ever had, oldest first.
    async fn find_by_client(&self, client_id: &ClientId)
        -> Result<Vec<Subscription>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SubscriptionRepository) {}
    }
}
