//! ListClientPaymentsHandler - Query handler for a client's payment history.

use std::sync::Arc;

use crate::domain::foundation::ClientId;
use crate::domain::payment::{Payment, PaymentError};
use crate::ports::PaymentRepository;

#[derive(Debug, Clone)]
pub struct ListClientPaymentsQuery {
    pub client_id: ClientId,
}

pub struct ListClientPaymentsHandler {
    payments: Arc<dyn PaymentRepository>,
}

impl ListClientPaymentsHandler {
    pub fn new(payments: Arc<dyn PaymentRepository>) -> Self {
        Self { payments }
    }

    /// All payments of the client, newest first.
    pub async fn handle(&self, query: ListClientPaymentsQuery) -> Result<Vec<Payment>, PaymentError> {
        Ok(self.payments.find_by_client(&query.client_id).await?)
    }
}
