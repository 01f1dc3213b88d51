//! Receipt handed back to the caller once a checkout succeeds.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::Timestamp;

/// How the payer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Kaspi,
}

impl PaymentMethod {
    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Bank card",
            PaymentMethod::Kaspi => "Kaspi Pay",
        }
    }
}

/// Finalized record of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub id: String,
    pub payment_id: String,
    pub amount: i64,
    pub currency: String,
    pub date: Timestamp,
    pub payment_method: PaymentMethod,
    pub plan_name: String,
    pub transaction_id: Option<String>,
}

impl PaymentReceipt {
    pub fn new(
        payment_id: impl Into<String>,
        amount: i64,
        currency: impl Into<String>,
        payment_method: PaymentMethod,
        plan_name: impl Into<String>,
        transaction_id: Option<String>,
        date: Timestamp,
    ) -> Self {
        Self {
            id: format!("receipt_{}", Uuid::new_v4().simple()),
            payment_id: payment_id.into(),
            amount,
            currency: currency.into(),
            date,
            payment_method,
            plan_name: plan_name.into(),
            transaction_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_ids_are_unique_and_prefixed() {
        let make = || {
            PaymentReceipt::new(
                "pay-1",
                15_000,
                "KZT",
                PaymentMethod::Kaspi,
                "Basic package",
                None,
                Timestamp::now(),
            )
        };
        let (a, b) = (make(), make());

        assert!(a.id.starts_with("receipt_"));
        assert_ne!(a.id, b.id);
        assert_eq!(a.payment_method.display_name(), "Kaspi Pay");
    }
}
