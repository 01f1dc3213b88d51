//! Kaspi Pay adapters.
//!
//! - `KaspiGateway` - signed HTTP client for the Kaspi QR API
//! - `MockPaymentGateway` - in-process stand-in for tests and local runs

mod gateway;
mod mock_gateway;
mod wire;

pub use gateway::KaspiGateway;
pub use mock_gateway::{MethodCall, MockPaymentGateway};
