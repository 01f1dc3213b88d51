//! HTTP adapter for subscription endpoints.
//!
//! - `GET /api/v1/subscriptions/user/:client_id` - Active subscription
//! - `POST /api/v1/subscriptions/:subscription_id/use-session` - Book a session
//! - `GET /api/v1/subscriptions/user/:client_id/history` - Package history

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use routes::subscription_routes;
