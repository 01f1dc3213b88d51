use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trainer_payments::adapters::http::{app_router, PaymentsAppState};
use trainer_payments::adapters::{
    InMemoryPaymentRepository, InMemorySubscriptionRepository, KaspiGateway,
};
use trainer_payments::config::AppConfig;
use trainer_payments::domain::payment::{KaspiWebhookVerifier, PackageCatalog};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);
    tracing::info!(
        environment = ?config.server.environment,
        kaspi_api = %config.kaspi.base_url(),
        "Starting trainer payments service"
    );

    let gateway = KaspiGateway::new(config.kaspi.clone());
    let webhook_verifier = KaspiWebhookVerifier::new(gateway.signer().clone());

    let state = PaymentsAppState::new(
        Arc::new(InMemoryPaymentRepository::new()),
        Arc::new(InMemorySubscriptionRepository::new()),
        Arc::new(gateway),
        Arc::new(PackageCatalog::standard().clone()),
        webhook_verifier,
    );

    let app = app_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` wins over
/// the configured level.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
