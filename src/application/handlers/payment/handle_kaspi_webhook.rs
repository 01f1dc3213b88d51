//! HandleKaspiWebhookHandler - Command handler for Kaspi status notifications.

use std::sync::Arc;

use crate::domain::foundation::PaymentId;
use crate::domain::payment::{KaspiWebhookVerifier, PaymentError, PaymentStatus, StatusChange};
use crate::ports::PaymentRepository;

use super::status_sync::PaymentStatusSync;

/// Command to handle a Kaspi webhook.
#[derive(Debug, Clone)]
pub struct HandleKaspiWebhookCommand {
    /// Raw webhook body.
    pub payload: Vec<u8>,
    /// Value of the `x-kaspi-signature` header, if sent.
    pub signature: Option<String>,
}

/// Result of webhook processing. Every variant is acknowledged to Kaspi.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleKaspiWebhookResult {
    /// The payment moved to a new status.
    Applied {
        payment_id: PaymentId,
        from: PaymentStatus,
        to: PaymentStatus,
    },
    /// The payment already had the reported status.
    Unchanged { payment_id: PaymentId },
    /// No payment carries this gateway id.
    UnknownPayment { gateway_payment_id: String },
    /// The notification could not be applied (unknown or conflicting status).
    Ignored { reason: String },
}

/// Handler for Kaspi webhooks.
///
/// Authenticates the body, then feeds the reported status through the same
/// path as a status poll.
pub struct HandleKaspiWebhookHandler {
    payments: Arc<dyn PaymentRepository>,
    verifier: KaspiWebhookVerifier,
    sync: Arc<PaymentStatusSync>,
}

impl HandleKaspiWebhookHandler {
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        verifier: KaspiWebhookVerifier,
        sync: Arc<PaymentStatusSync>,
    ) -> Self {
        Self {
            payments,
            verifier,
            sync,
        }
    }

    /// # Errors
    ///
    /// - `InvalidWebhookSignature` - missing or wrong signature
    /// - `ValidationFailed` - body is not a notification
    /// - `Infrastructure` - persistence failed
    pub async fn handle(
        &self,
        cmd: HandleKaspiWebhookCommand,
    ) -> Result<HandleKaspiWebhookResult, PaymentError> {
        // 1. Authenticate and parse
        let notification = self
            .verifier
            .verify_and_parse(&cmd.payload, cmd.signature.as_deref())
            .map_err(|e| {
                tracing::warn!(error = %e, "Rejected Kaspi webhook");
                if e.is_authentication_failure() {
                    PaymentError::invalid_webhook_signature()
                } else {
                    PaymentError::validation("body", e.to_string())
                }
            })?;

        let reported = match notification.reported_status() {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(
                    gateway_payment_id = %notification.payment_id,
                    error = %e,
                    "Ignoring webhook with unknown status"
                );
                return Ok(HandleKaspiWebhookResult::Ignored {
                    reason: e.to_string(),
                });
            }
        };

        // 2. Find the payment
        let Some(mut payment) = self
            .payments
            .find_by_gateway_payment_id(&notification.payment_id)
            .await?
        else {
            tracing::info!(
                gateway_payment_id = %notification.payment_id,
                "Webhook for unknown payment acknowledged"
            );
            return Ok(HandleKaspiWebhookResult::UnknownPayment {
                gateway_payment_id: notification.payment_id,
            });
        };

        // 3. Apply the status
        match self
            .sync
            .apply(
                &mut payment,
                reported,
                notification.transaction_id,
                notification.paid_at,
            )
            .await
        {
            Ok(StatusChange::Transitioned { from, to }) => Ok(HandleKaspiWebhookResult::Applied {
                payment_id: payment.id,
                from,
                to,
            }),
            Ok(StatusChange::Unchanged) => Ok(HandleKaspiWebhookResult::Unchanged {
                payment_id: payment.id,
            }),
            Err(e @ PaymentError::InvalidState { .. }) => {
                tracing::warn!(
                    payment_id = %payment.id,
                    current = %payment.status,
                    reported = %reported,
                    "Ignoring conflicting webhook status"
                );
                Ok(HandleKaspiWebhookResult::Ignored {
                    reason: e.message(),
                })
            }
            Err(e) => Err(e),
        }
    }
}
