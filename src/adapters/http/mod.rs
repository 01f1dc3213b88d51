//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure. All of
//! them share `PaymentsAppState` and the response envelope in `response`.

pub mod payments;
pub mod response;
pub mod router;
pub mod state;
pub mod subscriptions;

// Re-export key types for convenience
pub use response::{ApiError, ApiResponse, ErrorResponse};
pub use router::{api_router, app_router, HealthResponse};
pub use state::PaymentsAppState;
