//! Simulated card acquirer.
//!
//! There is no card acquiring contract behind the checkout yet, so card
//! charges are settled locally. Two well-known test numbers decline.

use async_trait::async_trait;
use uuid::Uuid;

use crate::ports::{CardAuthorization, CardChargeRequest, CardDecline, CardProcessor};

/// Approves every charge except the decline test cards.
#[derive(Debug, Clone, Default)]
pub struct SimulatedCardProcessor;

impl SimulatedCardProcessor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CardProcessor for SimulatedCardProcessor {
    async fn charge(&self, request: CardChargeRequest) -> Result<CardAuthorization, CardDecline> {
        let number = request.card.normalized_number();

        if number.ends_with("0002") {
            return Err(CardDecline::DeclinedByBank);
        }
        if number.ends_with("0119") {
            return Err(CardDecline::InsufficientFunds);
        }

        let authorization = CardAuthorization {
            payment_id: format!("card_{}", Uuid::new_v4().simple()),
            transaction_id: Uuid::new_v4().to_string(),
        };
        tracing::info!(
            payment_id = %authorization.payment_id,
            amount = request.amount,
            currency = %request.currency,
            card = %request.card.masked_number(),
            "Card charge approved"
        );
        Ok(authorization)
    }
}
