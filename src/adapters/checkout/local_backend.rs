//! In-process checkout backend.
//!
//! Runs the payment handlers directly, for checkouts embedded in the same
//! process as the payments service (and for tests).

use async_trait::async_trait;

use crate::adapters::http::PaymentsAppState;
use crate::application::handlers::payment::{
    CancelPaymentCommand, CheckPaymentStatusQuery, CreatePaymentCommand,
};
use crate::domain::foundation::PaymentId;
use crate::domain::payment::PaymentError;
use crate::ports::{
    BackendError, CheckoutBackend, CheckoutRequest, CreatedPayment, PaymentStatusReport,
};

/// `CheckoutBackend` backed by the application handlers.
#[derive(Clone)]
pub struct LocalCheckoutBackend {
    state: PaymentsAppState,
}

impl LocalCheckoutBackend {
    pub fn new(state: PaymentsAppState) -> Self {
        Self { state }
    }
}

fn parse_id(raw: &str) -> Result<PaymentId, BackendError> {
    raw.parse().map_err(|_| BackendError::Rejected {
        status: 404,
        message: format!("Payment not found: {}", raw),
    })
}

/// Same status codes the REST API would answer with.
fn rejected(err: PaymentError) -> BackendError {
    let status = match &err {
        PaymentError::NotFound(_) | PaymentError::PackageNotFound(_) => 404,
        PaymentError::InvalidWebhookSignature => 401,
        PaymentError::InvalidState { .. } => 409,
        PaymentError::Infrastructure(_) => 500,
        PaymentError::Gateway { .. } | PaymentError::ValidationFailed { .. } => 400,
    };
    BackendError::Rejected {
        status,
        message: err.message(),
    }
}

#[async_trait]
impl CheckoutBackend for LocalCheckoutBackend {
    async fn create_payment(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CreatedPayment, BackendError> {
        let cmd = CreatePaymentCommand {
            package_id: request.package_id.clone(),
            client_id: request.client_id.clone(),
            client_name: request.client_name.clone(),
            client_phone: request.client_phone.clone(),
            client_email: request.client_email.clone(),
        };

        let payment = self
            .state
            .create_payment_handler()
            .handle(cmd)
            .await
            .map_err(rejected)?;

        Ok(CreatedPayment {
            payment_id: payment.id.to_string(),
            order_id: payment.order_id.to_string(),
            amount: payment.amount,
            currency: payment.currency,
            package_name: payment.package.name,
            qr_code: payment.qr_code,
            qr_image: payment.qr_image,
            deeplink: payment.deeplink,
            expires_at: payment.expires_at,
        })
    }

    async fn payment_status(&self, payment_id: &str) -> Result<PaymentStatusReport, BackendError> {
        let query = CheckPaymentStatusQuery {
            payment_id: parse_id(payment_id)?,
        };

        let payment = self
            .state
            .check_payment_status_handler()
            .handle(query)
            .await
            .map_err(rejected)?;

        Ok(PaymentStatusReport {
            payment_id: payment.id.to_string(),
            status: payment.status,
            amount: payment.amount,
            currency: payment.currency,
            completed_at: payment.completed_at,
            transaction_id: payment.transaction_id,
        })
    }

    async fn cancel_payment(&self, payment_id: &str) -> Result<(), BackendError> {
        let cmd = CancelPaymentCommand {
            payment_id: parse_id(payment_id)?,
        };

        self.state
            .cancel_payment_handler()
            .handle(cmd)
            .await
            .map_err(rejected)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::adapters::checkout::SimulatedCardProcessor;
    use crate::adapters::kaspi::MockPaymentGateway;
    use crate::adapters::memory::{InMemoryPaymentRepository, InMemorySubscriptionRepository};
    use crate::application::checkout::{CheckoutConfig, CheckoutOrchestrator, CheckoutOutcome};
    use crate::domain::checkout::{CheckoutStep, KaspiMode, PaymentMethod, TIMEOUT_MESSAGE};
    use crate::domain::foundation::ClientId;
    use crate::domain::payment::{
        KaspiWebhookVerifier, PackageCatalog, PayloadSigner, PaymentStatus,
    };
    use crate::ports::{PaymentRepository, SubscriptionRepository};
    use secrecy::SecretString;

    struct Fixture {
        payments: Arc<InMemoryPaymentRepository>,
        subscriptions: Arc<InMemorySubscriptionRepository>,
        gateway: Arc<MockPaymentGateway>,
        backend: LocalCheckoutBackend,
    }

    fn fixture() -> Fixture {
        let payments = Arc::new(InMemoryPaymentRepository::new());
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
        let gateway = Arc::new(MockPaymentGateway::new());
        let state = PaymentsAppState::new(
            payments.clone(),
            subscriptions.clone(),
            gateway.clone(),
            Arc::new(PackageCatalog::standard().clone()),
            KaspiWebhookVerifier::new(PayloadSigner::new(SecretString::new(
                "secret".to_string(),
            ))),
        );
        Fixture {
            payments,
            subscriptions,
            gateway,
            backend: LocalCheckoutBackend::new(state),
        }
    }

    fn request(package_id: &str) -> CheckoutRequest {
        CheckoutRequest {
            package_id: package_id.to_string(),
            client_id: "client-1".to_string(),
            client_name: "Aigerim".to_string(),
            client_phone: None,
            client_email: None,
        }
    }

    #[tokio::test]
    async fn create_then_poll_reports_pending() {
        let f = fixture();

        let created = f.backend.create_payment(&request("standard")).await.unwrap();
        let report = f.backend.payment_status(&created.payment_id).await.unwrap();

        assert_eq!(created.amount, 25_000);
        assert_eq!(created.package_name, "Standard package");
        assert_eq!(report.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn unknown_package_is_rejected_with_404() {
        let f = fixture();

        let err = f.backend.create_payment(&request("gold")).await.unwrap_err();

        assert_eq!(
            err,
            BackendError::Rejected {
                status: 404,
                message: "Package not found: gold".to_string()
            }
        );
    }

    #[tokio::test]
    async fn malformed_id_is_rejected() {
        let f = fixture();

        let err = f.backend.payment_status("nope").await.unwrap_err();

        assert!(matches!(err, BackendError::Rejected { status: 404, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn checkout_timeout_leaves_payment_pending_and_no_subscription() {
        let f = fixture();
        let mut checkout = CheckoutOrchestrator::new(
            Arc::new(f.backend.clone()),
            Arc::new(SimulatedCardProcessor::new()),
            CheckoutConfig::default(),
        );
        checkout.select_method(PaymentMethod::Kaspi).unwrap();

        let outcome = checkout
            .pay_with_kaspi(&request("basic"), KaspiMode::Qr)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            CheckoutOutcome::TimedOut {
                message: TIMEOUT_MESSAGE.to_string()
            }
        );
        let polls = f.gateway.call_count("check_payment_status");
        assert!((98..=100).contains(&polls), "polled {} times", polls);
        let client = ClientId::new("client-1").unwrap();
        assert!(f
            .subscriptions
            .find_active_by_client(&client)
            .await
            .unwrap()
            .is_none());
        let payments = f.payments.find_by_client(&client).await.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].status, PaymentStatus::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn checkout_completes_and_activates_subscription() {
        let f = fixture();
        let mut checkout = CheckoutOrchestrator::new(
            Arc::new(f.backend.clone()),
            Arc::new(SimulatedCardProcessor::new()),
            CheckoutConfig {
                success_delay: Duration::from_millis(1500),
                ..CheckoutConfig::default()
            },
        );
        checkout.select_method(PaymentMethod::Kaspi).unwrap();
        let gateway = f.gateway.clone();
        let mut steps = checkout.subscribe();
        let payer = tokio::spawn(async move {
            while *steps.borrow_and_update() != CheckoutStep::Processing {
                steps.changed().await.unwrap();
            }
            gateway.set_payment_status("kaspi_1", PaymentStatus::Completed);
        });

        let outcome = checkout
            .pay_with_kaspi(&request("premium"), KaspiMode::App)
            .await
            .unwrap();
        payer.await.unwrap();

        assert!(matches!(outcome, CheckoutOutcome::Succeeded(_)));
        let sub = f
            .subscriptions
            .find_active_by_client(&ClientId::new("client-1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sub.sessions_remaining, 12);
    }
}
