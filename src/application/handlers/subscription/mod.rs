//! Subscription handlers.
//!
//! ## Commands
//! - Crediting a completed payment (`SubscriptionActivator`)
//! - Booking a session
//!
//! ## Queries
//! - Active subscription of a client
//! - Package purchase history

mod activator;
mod get_active_subscription;
mod get_package_history;
mod use_session;

pub use activator::{Activation, SubscriptionActivator};
pub use get_active_subscription::{
    GetActiveSubscriptionHandler, GetActiveSubscriptionQuery, GetActiveSubscriptionResult,
};
pub use get_package_history::{GetPackageHistoryHandler, GetPackageHistoryQuery};
pub use use_session::{UseSessionCommand, UseSessionHandler};
