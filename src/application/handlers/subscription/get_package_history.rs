//! GetPackageHistoryHandler - Query handler for a client's package purchases.

use std::sync::Arc;

use crate::domain::foundation::ClientId;
use crate::domain::subscription::{PackagePurchase, SubscriptionError};
use crate::ports::SubscriptionRepository;

#[derive(Debug, Clone)]
pub struct GetPackageHistoryQuery {
    pub client_id: ClientId,
}

pub struct GetPackageHistoryHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl GetPackageHistoryHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    /// Purchases credited to the client's latest subscription, oldest first.
    pub async fn handle(
        &self,
        query: GetPackageHistoryQuery,
    ) -> Result<Vec<PackagePurchase>, SubscriptionError> {
        let subscriptions = self.subscriptions.find_by_client(&query.client_id).await?;
        Ok(subscriptions
            .into_iter()
            .last()
            .map(|s| s.package_history)
            .unwrap_or_default())
    }
}
