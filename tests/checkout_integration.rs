//! End-to-end checkout tests.
//!
//! The payments API is served on a loopback port and the checkout talks to
//! it through `PaymentsApiClient`, the same way a separate frontend would.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use trainer_payments::adapters::http::{api_router, PaymentsAppState};
use trainer_payments::adapters::{
    InMemoryPaymentRepository, InMemorySubscriptionRepository, MockPaymentGateway,
    PaymentsApiClient, SimulatedCardProcessor,
};
use trainer_payments::application::{CheckoutConfig, CheckoutOrchestrator, CheckoutOutcome};
use trainer_payments::domain::checkout::{CheckoutStep, KaspiMode, PaymentMethod};
use trainer_payments::domain::foundation::ClientId;
use trainer_payments::domain::payment::{
    KaspiWebhookVerifier, PackageCatalog, PayloadSigner, PaymentStatus,
};
use trainer_payments::ports::{CheckoutRequest, SubscriptionRepository};

struct Service {
    base_url: String,
    gateway: Arc<MockPaymentGateway>,
    subscriptions: Arc<InMemorySubscriptionRepository>,
}

async fn start_service() -> Service {
    let gateway = Arc::new(MockPaymentGateway::new());
    let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
    let state = PaymentsAppState::new(
        Arc::new(InMemoryPaymentRepository::new()),
        subscriptions.clone(),
        gateway.clone(),
        Arc::new(PackageCatalog::standard().clone()),
        KaspiWebhookVerifier::new(PayloadSigner::new(SecretString::new("s".to_string()))),
    );
    let app = api_router().with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Service {
        base_url: format!("http://{}", addr),
        gateway,
        subscriptions,
    }
}

fn fast_config() -> CheckoutConfig {
    CheckoutConfig {
        poll_interval: Duration::from_millis(50),
        timeout: Duration::from_secs(10),
        success_delay: Duration::ZERO,
    }
}

fn request(package_id: &str, client_id: &str) -> CheckoutRequest {
    CheckoutRequest {
        package_id: package_id.to_string(),
        client_id: client_id.to_string(),
        client_name: "Aigerim Seitkali".to_string(),
        client_phone: None,
        client_email: Some("aigerim@example.kz".to_string()),
    }
}

#[tokio::test]
async fn kaspi_checkout_over_http_activates_subscription() {
    let service = start_service().await;
    let mut checkout = CheckoutOrchestrator::new(
        Arc::new(PaymentsApiClient::new(&service.base_url)),
        Arc::new(SimulatedCardProcessor::new()),
        fast_config(),
    );
    checkout.select_method(PaymentMethod::Kaspi).unwrap();

    let gateway = service.gateway.clone();
    let mut steps = checkout.subscribe();
    let payer = tokio::spawn(async move {
        while *steps.borrow_and_update() != CheckoutStep::Qr {
            steps.changed().await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(120)).await;
        gateway.set_payment_status("kaspi_1", PaymentStatus::Completed);
    });

    let outcome = checkout
        .pay_with_kaspi(&request("standard", "client-1"), KaspiMode::Qr)
        .await
        .unwrap();
    payer.await.unwrap();

    let receipt = match outcome {
        CheckoutOutcome::Succeeded(receipt) => receipt,
        other => panic!("expected success, got {:?}", other),
    };
    assert_eq!(receipt.amount, 25_000);
    assert_eq!(checkout.flow().step(), CheckoutStep::Success);

    let subscription = service
        .subscriptions
        .find_active_by_client(&ClientId::new("client-1").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(subscription.sessions_remaining, 8);
}

#[tokio::test]
async fn unknown_package_fails_checkout_with_service_message() {
    let service = start_service().await;
    let mut checkout = CheckoutOrchestrator::new(
        Arc::new(PaymentsApiClient::new(&service.base_url)),
        Arc::new(SimulatedCardProcessor::new()),
        fast_config(),
    );
    checkout.select_method(PaymentMethod::Kaspi).unwrap();

    let outcome = checkout
        .pay_with_kaspi(&request("gold", "client-2"), KaspiMode::Qr)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        CheckoutOutcome::Failed {
            message: "Package not found: gold".to_string()
        }
    );
    assert_eq!(checkout.flow().error_message(), Some("Package not found: gold"));
}

#[tokio::test]
async fn gateway_failure_is_reported_to_payer() {
    let service = start_service().await;
    let mut checkout = CheckoutOrchestrator::new(
        Arc::new(PaymentsApiClient::new(&service.base_url)),
        Arc::new(SimulatedCardProcessor::new()),
        fast_config(),
    );
    checkout.select_method(PaymentMethod::Kaspi).unwrap();

    let gateway = service.gateway.clone();
    let mut steps = checkout.subscribe();
    let payer = tokio::spawn(async move {
        while *steps.borrow_and_update() != CheckoutStep::Processing {
            steps.changed().await.unwrap();
        }
        gateway.set_payment_status("kaspi_1", PaymentStatus::Failed);
    });

    let outcome = checkout
        .pay_with_kaspi(&request("basic", "client-3"), KaspiMode::App)
        .await
        .unwrap();
    payer.await.unwrap();

    assert!(matches!(outcome, CheckoutOutcome::Failed { .. }));
    assert_eq!(checkout.flow().step(), CheckoutStep::Error);
    assert!(service
        .subscriptions
        .find_active_by_client(&ClientId::new("client-3").unwrap())
        .await
        .unwrap()
        .is_none());
}
