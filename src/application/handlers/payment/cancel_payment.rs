//! CancelPaymentHandler - Command handler for cancelling a pending payment.

use std::sync::Arc;

use crate::domain::foundation::PaymentId;
use crate::domain::payment::{Payment, PaymentError, PaymentStatus};
use crate::ports::{PaymentGateway, PaymentRepository};

#[derive(Debug, Clone)]
pub struct CancelPaymentCommand {
    pub payment_id: PaymentId,
}

#[derive(Debug, Clone)]
pub struct CancelPaymentResult {
    pub payment: Payment,
    /// Confirmation text from the gateway, if it sent one.
    pub gateway_message: Option<String>,
}

/// Handler for cancelling payments.
///
/// Only pending payments can be cancelled. The gateway must confirm the
/// cancellation before the payment is marked cancelled.
pub struct CancelPaymentHandler {
    payments: Arc<dyn PaymentRepository>,
    gateway: Arc<dyn PaymentGateway>,
}

impl CancelPaymentHandler {
    pub fn new(payments: Arc<dyn PaymentRepository>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { payments, gateway }
    }

    pub async fn handle(&self, cmd: CancelPaymentCommand) -> Result<CancelPaymentResult, PaymentError> {
        let mut payment = self
            .payments
            .find_by_id(&cmd.payment_id)
            .await?
            .ok_or(PaymentError::NotFound(cmd.payment_id))?;

        if !payment.is_pending() {
            return Err(PaymentError::invalid_state(
                payment.status.as_str(),
                PaymentStatus::Cancelled.as_str(),
            ));
        }

        let ack = self
            .gateway
            .cancel_payment(&payment.gateway_payment_id)
            .await
            .map_err(|e| PaymentError::gateway(e.message))?;

        payment.cancel()?;
        self.payments.update(&payment).await?;

        tracing::info!(payment_id = %payment.id, "Payment cancelled");

        Ok(CancelPaymentResult {
            payment,
            gateway_message: ack.message,
        })
    }
}
