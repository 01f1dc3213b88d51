//! Subscription domain - session balances bought with training packages.

mod aggregate;
mod errors;
mod status;

pub use aggregate::{PackagePurchase, Subscription};
pub use errors::SubscriptionError;
pub use status::SubscriptionStatus;
