//! Applies a gateway-reported status to a stored payment.
//!
//! Shared by the status poll and the webhook so both follow the same rules:
//! a fresh completion is credited to the payer's subscription before the
//! payment is stored as completed. If crediting fails the stored payment
//! stays pending, so the next poll or webhook retries it; the activator
//! skips a payment it already credited.

use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::domain::payment::{Payment, PaymentError, PaymentStatus, StatusChange};
use crate::ports::PaymentRepository;

use crate::application::handlers::subscription::SubscriptionActivator;

pub struct PaymentStatusSync {
    payments: Arc<dyn PaymentRepository>,
    activator: Arc<SubscriptionActivator>,
}

impl PaymentStatusSync {
    pub fn new(payments: Arc<dyn PaymentRepository>, activator: Arc<SubscriptionActivator>) -> Self {
        Self {
            payments,
            activator,
        }
    }

    /// # Errors
    ///
    /// - `InvalidState` - the payment already settled with a different status
    /// - `Infrastructure` - persisting the payment or the subscription failed
    pub async fn apply(
        &self,
        payment: &mut Payment,
        reported: PaymentStatus,
        transaction_id: Option<String>,
        paid_at: Option<Timestamp>,
    ) -> Result<StatusChange, PaymentError> {
        let change = payment.reconcile(reported, transaction_id, paid_at)?;

        let StatusChange::Transitioned { from, to } = change else {
            return Ok(change);
        };

        if change.completed_now() {
            if let Err(e) = self.activator.activate(payment).await {
                tracing::error!(
                    payment_id = %payment.id,
                    error = %e,
                    "Subscription activation failed; payment left pending"
                );
                return Err(e.into());
            }
        }

        self.payments.update(payment).await?;
        tracing::info!(
            payment_id = %payment.id,
            gateway_payment_id = %payment.gateway_payment_id,
            from = %from,
            to = %to,
            "Payment status changed"
        );

        Ok(change)
    }
}
