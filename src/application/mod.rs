//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).
//! The checkout orchestrator drives the payer-facing flow on top of them.

pub mod checkout;
pub mod handlers;

pub use checkout::{CancelHandle, CheckoutConfig, CheckoutOrchestrator, CheckoutOutcome};
