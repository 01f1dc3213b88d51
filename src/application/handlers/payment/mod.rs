//! Payment handlers.
//!
//! ## Commands
//! - Creating a Kaspi QR payment
//! - Cancelling a pending payment
//! - Processing Kaspi webhooks
//!
//! ## Queries
//! - Package catalog
//! - Payment status (polls the gateway)
//! - Payments of a client

mod cancel_payment;
mod check_payment_status;
mod create_payment;
mod handle_kaspi_webhook;
mod list_client_payments;
mod list_packages;
mod status_sync;

// Commands
pub use cancel_payment::{CancelPaymentCommand, CancelPaymentHandler, CancelPaymentResult};
pub use create_payment::{CreatePaymentCommand, CreatePaymentHandler};
pub use handle_kaspi_webhook::{
    HandleKaspiWebhookCommand, HandleKaspiWebhookHandler, HandleKaspiWebhookResult,
};
pub use status_sync::PaymentStatusSync;

// Queries
pub use check_payment_status::{CheckPaymentStatusHandler, CheckPaymentStatusQuery};
pub use list_client_payments::{ListClientPaymentsHandler, ListClientPaymentsQuery};
pub use list_packages::ListPackagesHandler;
