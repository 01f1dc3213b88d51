//! Checkout orchestration.
//!
//! Runs a `CheckoutFlow` against the payments service: creation, polling,
//! countdown, cancellation and card charges.

mod orchestrator;

pub use orchestrator::{CancelHandle, CheckoutConfig, CheckoutOrchestrator, CheckoutOutcome};
