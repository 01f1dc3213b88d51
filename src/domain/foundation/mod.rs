//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, the state machine trait and error
//! types shared by the payment, subscription and checkout domains.

mod contact;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use contact::{Email, PhoneNumber};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ClientId, OrderId, PackageId, PaymentId, SubscriptionId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
