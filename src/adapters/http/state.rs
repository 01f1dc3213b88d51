//! Shared application state for the REST API.

use std::sync::Arc;

use crate::application::handlers::payment::{
    CancelPaymentHandler, CheckPaymentStatusHandler, CreatePaymentHandler,
    HandleKaspiWebhookHandler, ListClientPaymentsHandler, ListPackagesHandler, PaymentStatusSync,
};
use crate::application::handlers::subscription::{
    GetActiveSubscriptionHandler, GetPackageHistoryHandler, SubscriptionActivator,
    UseSessionHandler,
};
use crate::domain::payment::{KaspiWebhookVerifier, PackageCatalog};
use crate::ports::{PaymentGateway, PaymentRepository, SubscriptionRepository};

/// Shared application state containing all dependencies.
///
/// Cloned for each request; every dependency is Arc-wrapped. Handlers are
/// built on demand from the shared ports.
#[derive(Clone)]
pub struct PaymentsAppState {
    pub payment_repository: Arc<dyn PaymentRepository>,
    pub subscription_repository: Arc<dyn SubscriptionRepository>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub catalog: Arc<PackageCatalog>,
    pub webhook_verifier: KaspiWebhookVerifier,
}

impl PaymentsAppState {
    pub fn new(
        payment_repository: Arc<dyn PaymentRepository>,
        subscription_repository: Arc<dyn SubscriptionRepository>,
        gateway: Arc<dyn PaymentGateway>,
        catalog: Arc<PackageCatalog>,
        webhook_verifier: KaspiWebhookVerifier,
    ) -> Self {
        Self {
            payment_repository,
            subscription_repository,
            gateway,
            catalog,
            webhook_verifier,
        }
    }

    /// The single status-application path shared by polling and webhooks.
    pub fn status_sync(&self) -> Arc<PaymentStatusSync> {
        let activator = Arc::new(SubscriptionActivator::new(
            self.subscription_repository.clone(),
        ));
        Arc::new(PaymentStatusSync::new(
            self.payment_repository.clone(),
            activator,
        ))
    }

    pub fn list_packages_handler(&self) -> ListPackagesHandler {
        ListPackagesHandler::new(self.catalog.clone())
    }

    pub fn create_payment_handler(&self) -> CreatePaymentHandler {
        CreatePaymentHandler::new(
            self.payment_repository.clone(),
            self.gateway.clone(),
            self.catalog.clone(),
        )
    }

    pub fn check_payment_status_handler(&self) -> CheckPaymentStatusHandler {
        CheckPaymentStatusHandler::new(
            self.payment_repository.clone(),
            self.gateway.clone(),
            self.status_sync(),
        )
    }

    pub fn cancel_payment_handler(&self) -> CancelPaymentHandler {
        CancelPaymentHandler::new(self.payment_repository.clone(), self.gateway.clone())
    }

    pub fn webhook_handler(&self) -> HandleKaspiWebhookHandler {
        HandleKaspiWebhookHandler::new(
            self.payment_repository.clone(),
            self.webhook_verifier.clone(),
            self.status_sync(),
        )
    }

    pub fn list_client_payments_handler(&self) -> ListClientPaymentsHandler {
        ListClientPaymentsHandler::new(self.payment_repository.clone())
    }

    pub fn active_subscription_handler(&self) -> GetActiveSubscriptionHandler {
        GetActiveSubscriptionHandler::new(self.subscription_repository.clone())
    }

    pub fn use_session_handler(&self) -> UseSessionHandler {
        UseSessionHandler::new(self.subscription_repository.clone())
    }

    pub fn package_history_handler(&self) -> GetPackageHistoryHandler {
        GetPackageHistoryHandler::new(self.subscription_repository.clone())
    }
}
