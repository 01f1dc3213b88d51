//! CheckPaymentStatusHandler - Query handler that polls the gateway.
//!
//! Despite being a query, a poll that observes a new status persists it and
//! may credit the payer's subscription.

use std::sync::Arc;

use crate::domain::foundation::PaymentId;
use crate::domain::payment::{Payment, PaymentError};
use crate::ports::{PaymentGateway, PaymentRepository};

use super::status_sync::PaymentStatusSync;

#[derive(Debug, Clone)]
pub struct CheckPaymentStatusQuery {
    pub payment_id: PaymentId,
}

pub struct CheckPaymentStatusHandler {
    payments: Arc<dyn PaymentRepository>,
    gateway: Arc<dyn PaymentGateway>,
    sync: Arc<PaymentStatusSync>,
}

impl CheckPaymentStatusHandler {
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        gateway: Arc<dyn PaymentGateway>,
        sync: Arc<PaymentStatusSync>,
    ) -> Self {
        Self {
            payments,
            gateway,
            sync,
        }
    }

    /// Returns the payment as it stands after the poll.
    ///
    /// Settled payments are returned as stored without asking the gateway.
    pub async fn handle(&self, query: CheckPaymentStatusQuery) -> Result<Payment, PaymentError> {
        let mut payment = self
            .payments
            .find_by_id(&query.payment_id)
            .await?
            .ok_or(PaymentError::NotFound(query.payment_id))?;

        if !payment.is_pending() {
            return Ok(payment);
        }

        let report = self
            .gateway
            .check_payment_status(&payment.gateway_payment_id)
            .await
            .map_err(|e| PaymentError::gateway(e.message))?;

        self.sync
            .apply(
                &mut payment,
                report.status,
                report.transaction_id,
                report.paid_at,
            )
            .await?;

        Ok(payment)
    }
}
