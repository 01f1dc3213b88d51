//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `kaspi` - Kaspi QR gateway client and a scriptable mock
//! - `memory` - In-memory repositories
//! - `http` - REST API (axum)
//! - `checkout` - Checkout backends and the simulated card processor

pub mod checkout;
pub mod http;
pub mod kaspi;
pub mod memory;

pub use checkout::{LocalCheckoutBackend, PaymentsApiClient, SimulatedCardProcessor};
pub use kaspi::{KaspiGateway, MockPaymentGateway};
pub use memory::{InMemoryPaymentRepository, InMemorySubscriptionRepository};
