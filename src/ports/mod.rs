//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Server-side Ports
//!
//! - `PaymentGateway` - QR payment processor (Kaspi)
//! - `PaymentRepository` - Payment persistence
//! - `SubscriptionRepository` - Subscription persistence
//!
//! ## Checkout Ports
//!
//! - `CheckoutBackend` - The payments service as seen by the checkout flow
//! - `CardProcessor` - Direct card charges

mod card_processor;
mod checkout_backend;
mod payment_gateway;
mod payment_repository;
mod subscription_repository;

pub use card_processor::{CardAuthorization, CardChargeRequest, CardDecline, CardProcessor};
pub use checkout_backend::{
    BackendError, CheckoutBackend, CheckoutRequest, CreatedPayment, PaymentStatusReport,
};
pub use payment_gateway::{
    CancellationAck, CreateQrPaymentRequest, GatewayError, GatewayErrorCode,
    GatewayPaymentStatus, PaymentGateway,
};
pub use payment_repository::PaymentRepository;
pub use subscription_repository::SubscriptionRepository;
