//! HTTP adapter for payment endpoints.
//!
//! Exposes the payment handlers via REST API:
//! - `GET /api/v1/payments/packages` - Package catalog
//! - `POST /api/v1/payments/create` - Start a Kaspi QR payment
//! - `GET /api/v1/payments/:payment_id/status` - Poll the payment status
//! - `POST /api/v1/payments/:payment_id/cancel` - Cancel a pending payment
//! - `POST /api/v1/payments/webhook` - Kaspi status notifications
//! - `GET /api/v1/payments/user/:client_id` - Payment history of a client

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use routes::payment_routes;
