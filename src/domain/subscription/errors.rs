//! Subscription-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId};

use super::SubscriptionStatus;

/// Errors raised by subscription queries and session bookings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    #[error("Subscription not found: {0}")]
    NotFound(SubscriptionId),

    #[error("Subscription is not active (status: {0})")]
    Inactive(SubscriptionStatus),

    #[error("Subscription has expired")]
    Expired(SubscriptionId),

    #[error("No sessions remaining")]
    NoSessionsRemaining,

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl SubscriptionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SubscriptionError::NotFound(_) => ErrorCode::SubscriptionNotFound,
            SubscriptionError::Inactive(_) => ErrorCode::SubscriptionInactive,
            SubscriptionError::Expired(_) => ErrorCode::SubscriptionExpired,
            SubscriptionError::NoSessionsRemaining => ErrorCode::NoSessionsRemaining,
            SubscriptionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for SubscriptionError {
    fn from(err: DomainError) -> Self {
        SubscriptionError::Infrastructure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_variants() {
        assert_eq!(
            SubscriptionError::NotFound(SubscriptionId::new()).code(),
            ErrorCode::SubscriptionNotFound
        );
        assert_eq!(
            SubscriptionError::NoSessionsRemaining.code(),
            ErrorCode::NoSessionsRemaining
        );
    }

    #[test]
    fn inactive_displays_status() {
        let err = SubscriptionError::Inactive(SubscriptionStatus::Cancelled);
        assert_eq!(err.to_string(), "Subscription is not active (status: cancelled)");
    }
}
