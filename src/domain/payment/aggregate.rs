//! Payment aggregate entity.
//!
//! A Payment is created only after the gateway issued a QR session for it,
//! so every stored payment carries a gateway payment id. Payments are never
//! deleted; a terminal status is final.
//!
//! # Design Decisions
//!
//! - **Package snapshot**: the purchased package is copied onto the payment
//! - **Money in whole units**: amounts are i64 in the currency's major unit
//! - **Idempotent reconciliation**: repeating the current status is a no-op

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ClientId, DomainError, Email, ErrorCode, OrderId, PaymentId, PhoneNumber, StateMachine,
    Timestamp,
};

use super::{PaymentStatus, TrainingPackage};

/// Who is paying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    pub client_id: ClientId,
    pub name: String,
    pub phone: Option<PhoneNumber>,
    pub email: Option<Email>,
}

/// QR session issued by the gateway for a new payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrCheckout {
    pub gateway_payment_id: String,
    pub qr_code: String,
    pub qr_image: Option<String>,
    pub deeplink: Option<String>,
    pub expires_at: Option<Timestamp>,
}

/// Result of applying a gateway-reported status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// The payment already had the reported status.
    Unchanged,

    /// The payment moved between statuses.
    Transitioned {
        from: PaymentStatus,
        to: PaymentStatus,
    },
}

impl StatusChange {
    /// True when this change is the one that completed the payment.
    pub fn completed_now(&self) -> bool {
        matches!(
            self,
            StatusChange::Transitioned {
                to: PaymentStatus::Completed,
                ..
            }
        )
    }
}

/// Payment aggregate.
///
/// # Invariants
///
/// - `status` leaves `Pending` at most once
/// - `completed_at` and `transaction_id` are only set on `Completed`
/// - `cancelled_at` is only set on `Cancelled`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub gateway_payment_id: String,
    pub package: TrainingPackage,
    pub payer: Payer,
    pub amount: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub qr_code: String,
    pub qr_image: Option<String>,
    pub deeplink: Option<String>,
    pub transaction_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
}

impl Payment {
    /// Record a freshly issued QR payment.
    pub fn create_pending(
        id: PaymentId,
        order_id: OrderId,
        package: TrainingPackage,
        payer: Payer,
        checkout: QrCheckout,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            order_id,
            gateway_payment_id: checkout.gateway_payment_id,
            amount: package.price,
            currency: package.currency.clone(),
            package,
            payer,
            status: PaymentStatus::Pending,
            qr_code: checkout.qr_code,
            qr_image: checkout.qr_image,
            deeplink: checkout.deeplink,
            transaction_id: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
            cancelled_at: None,
            expires_at: checkout.expires_at,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == PaymentStatus::Pending
    }

    /// Apply a status reported by the gateway (poll or webhook).
    ///
    /// Reporting the current status again returns `Unchanged`. A conflicting
    /// report for a payment that already settled is rejected.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` if the payment cannot move to `reported`.
    pub fn reconcile(
        &mut self,
        reported: PaymentStatus,
        transaction_id: Option<String>,
        paid_at: Option<Timestamp>,
    ) -> Result<StatusChange, DomainError> {
        if reported == self.status {
            return Ok(StatusChange::Unchanged);
        }

        let from = self.status;
        self.transition_to(reported)?;

        let now = Timestamp::now();
        match reported {
            PaymentStatus::Completed => {
                self.completed_at = Some(paid_at.unwrap_or(now));
                self.transaction_id = transaction_id;
            }
            PaymentStatus::Cancelled => self.cancelled_at = Some(now),
            _ => {}
        }
        self.updated_at = now;

        Ok(StatusChange::Transitioned { from, to: reported })
    }

    /// Cancel a pending payment.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` unless the payment is pending.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.transition_to(PaymentStatus::Cancelled)?;
        let now = Timestamp::now();
        self.cancelled_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    fn transition_to(&mut self, target: PaymentStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Cannot transition payment from {} to {}",
                    self.status, target
                ),
            )
            .with_detail("current", self.status.as_str())
            .with_detail("attempted", target.as_str())
        })?;
        Ok(())
    }
}
