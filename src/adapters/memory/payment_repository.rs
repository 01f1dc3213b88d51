//! In-memory payment repository.
//!
//! Backs the service in development and tests; state lives for the
//! lifetime of the process.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{ClientId, DomainError, ErrorCode, PaymentId};
use crate::domain::payment::Payment;
use crate::ports::PaymentRepository;

#[derive(Debug, Clone)]
pub struct InMemoryPaymentRepository {
    payments: Arc<RwLock<HashMap<PaymentId, Payment>>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self {
            payments: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored payments.
    pub async fn len(&self) -> usize {
        self.payments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.payments.read().await.is_empty()
    }
}

impl Default for InMemoryPaymentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn save(&self, payment: &Payment) -> Result<(), DomainError> {
        let mut payments = self.payments.write().await;
        if payments.contains_key(&payment.id) {
            return Err(DomainError::validation(
                "payment_id",
                format!("Payment {} already exists", payment.id),
            ));
        }
        payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn update(&self, payment: &Payment) -> Result<(), DomainError> {
        let mut payments = self.payments.write().await;
        match payments.get_mut(&payment.id) {
            Some(existing) => {
                *existing = payment.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::PaymentNotFound,
                format!("Payment not found: {}", payment.id),
            )),
        }
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        Ok(self.payments.read().await.get(id).cloned())
    }

    async fn find_by_gateway_payment_id(
        &self,
        gateway_payment_id: &str,
    ) -> Result<Option<Payment>, DomainError> {
        let payments = self.payments.read().await;
        Ok(payments
            .values()
            .find(|p| p.gateway_payment_id == gateway_payment_id)
            .cloned())
    }

    async fn find_by_client(&self, client_id: &ClientId) -> Result<Vec<Payment>, DomainError> {
        let payments = self.payments.read().await;
        let mut found: Vec<Payment> = payments
            .values()
            .filter(|p| &p.payer.client_id == client_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::payment::test_support::pending_payment;
    use crate::domain::payment::PaymentStatus;

    #[tokio::test]
    async fn save_then_find_by_id() {
        let repo = InMemoryPaymentRepository::new();
        let payment = pending_payment("basic", "client-1", "kaspi-1");

        repo.save(&payment).await.unwrap();

        assert_eq!(repo.find_by_id(&payment.id).await.unwrap(), Some(payment));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn save_twice_is_rejected() {
        let repo = InMemoryPaymentRepository::new();
        let payment = pending_payment("basic", "client-1", "kaspi-1");

        repo.save(&payment).await.unwrap();
        let err = repo.save(&payment).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn update_unknown_payment_fails() {
        let repo = InMemoryPaymentRepository::new();
        let payment = pending_payment("basic", "client-1", "kaspi-1");

        let err = repo.update(&payment).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::PaymentNotFound);
    }

    #[tokio::test]
    async fn update_replaces_stored_payment() {
        let repo = InMemoryPaymentRepository::new();
        let mut payment = pending_payment("basic", "client-1", "kaspi-1");
        repo.save(&payment).await.unwrap();

        payment.cancel().unwrap();
        repo.update(&payment).await.unwrap();

        let stored = repo.find_by_id(&payment.id).await.unwrap().unwrap();
        assert_eq!(stored.status, PaymentStatus::Cancelled);
    }

    #[tokio::test]
    async fn finds_by_gateway_payment_id() {
        let repo = InMemoryPaymentRepository::new();
        let payment = pending_payment("basic", "client-1", "kaspi-42");
        repo.save(&payment).await.unwrap();

        let found = repo.find_by_gateway_payment_id("kaspi-42").await.unwrap();
        assert_eq!(found.map(|p| p.id), Some(payment.id));
        assert!(repo.find_by_gateway_payment_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_by_client_returns_newest_first() {
        let repo = InMemoryPaymentRepository::new();
        let mut older = pending_payment("basic", "client-1", "kaspi-1");
        older.created_at = Timestamp::now().minus_days(2);
        let newer = pending_payment("premium", "client-1", "kaspi-2");
        let other = pending_payment("basic", "client-2", "kaspi-3");
        for p in [&older, &newer, &other] {
            repo.save(p).await.unwrap();
        }

        let client = ClientId::new("client-1").unwrap();
        let ids: Vec<_> = repo
            .find_by_client(&client)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();

        assert_eq!(ids, vec![newer.id, older.id]);
    }
}
