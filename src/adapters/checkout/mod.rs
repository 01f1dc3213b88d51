//! Checkout adapters.
//!
//! - `PaymentsApiClient` - the payments REST API over HTTP
//! - `LocalCheckoutBackend` - the same operations, in-process
//! - `SimulatedCardProcessor` - local card settlement

mod api_client;
mod card_processor;
mod local_backend;

pub use api_client::PaymentsApiClient;
pub use card_processor::SimulatedCardProcessor;
pub use local_backend::LocalCheckoutBackend;
