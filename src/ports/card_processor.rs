//! Card processor port.
//!
//! Charges a validated card directly. Card payments do not go through the
//! QR gateway and complete synchronously.

use crate::domain::checkout::CardDetails;
use async_trait::async_trait;
use thiserror::Error;

#[async_trait]
pub trait CardProcessor: Send + Sync {
    async fn charge(&self, request: CardChargeRequest) -> Result<CardAuthorization, CardDecline>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardChargeRequest {
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub card: CardDetails,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardAuthorization {
    pub payment_id: String,
    pub transaction_id: String,
}

/// Why the issuer refused the charge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardDecline {
    #[error("Card declined by bank")]
    DeclinedByBank,

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Card processing unavailable: {0}")]
    Unavailable(String),
}
