//! Checkout flow.
//!
//! Pure state: which step the payer is on, which method they picked, and the
//! outcome once there is one. Timers and gateway calls live in the
//! application layer's orchestrator, which drives this type.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{StateMachine, ValidationError};

use super::{CardDetails, CheckoutStep, PaymentMethod, PaymentReceipt};

/// Message shown when the payer never confirms within the countdown.
pub const TIMEOUT_MESSAGE: &str = "Payment wait time expired";

/// Fallback message when the gateway reports failure without a reason.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Payment was not completed";

/// How a Kaspi payment is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KaspiMode {
    /// Scan a QR code with another device.
    Qr,
    /// Open the Kaspi app through a deeplink.
    App,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Cannot move checkout from {from:?} to {to:?}")]
    InvalidTransition { from: CheckoutStep, to: CheckoutStep },

    #[error("Card details are invalid ({} problem(s))", .0.len())]
    InvalidCard(Vec<ValidationError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutFlow {
    step: CheckoutStep,
    method: Option<PaymentMethod>,
    kaspi_mode: Option<KaspiMode>,
    error: Option<String>,
    card_errors: Vec<ValidationError>,
    receipt: Option<PaymentReceipt>,
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutFlow {
    pub fn new() -> Self {
        Self {
            step: CheckoutStep::Method,
            method: None,
            kaspi_mode: None,
            error: None,
            card_errors: Vec::new(),
            receipt: None,
        }
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn method(&self) -> Option<PaymentMethod> {
        self.method
    }

    pub fn kaspi_mode(&self) -> Option<KaspiMode> {
        self.kaspi_mode
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Field errors from the last rejected card submission.
    pub fn card_errors(&self) -> &[ValidationError] {
        &self.card_errors
    }

    pub fn receipt(&self) -> Option<&PaymentReceipt> {
        self.receipt.as_ref()
    }

    /// Card goes to detail entry, Kaspi to its own sub-flow.
    pub fn select_method(&mut self, method: PaymentMethod) -> Result<CheckoutStep, CheckoutError> {
        let target = match method {
            PaymentMethod::Card => CheckoutStep::Details,
            PaymentMethod::Kaspi => CheckoutStep::Kaspi,
        };
        self.move_to(target)?;
        self.method = Some(method);
        self.error = None;
        self.card_errors.clear();
        Ok(target)
    }

    /// Validate card input and start processing.
    ///
    /// Invalid input keeps the flow on `Details` with every field error
    /// recorded.
    pub fn submit_card(
        &mut self,
        card: &CardDetails,
        today: NaiveDate,
    ) -> Result<CheckoutStep, CheckoutError> {
        if self.step != CheckoutStep::Details {
            return Err(CheckoutError::InvalidTransition {
                from: self.step,
                to: CheckoutStep::Processing,
            });
        }

        if let Err(errors) = card.validate(today) {
            self.card_errors = errors.clone();
            return Err(CheckoutError::InvalidCard(errors));
        }

        self.card_errors.clear();
        self.move_to(CheckoutStep::Processing)?;
        Ok(CheckoutStep::Processing)
    }

    /// QR shows a code; App hands off to the Kaspi app and waits.
    pub fn choose_kaspi_mode(&mut self, mode: KaspiMode) -> Result<CheckoutStep, CheckoutError> {
        let target = match mode {
            KaspiMode::Qr => CheckoutStep::Qr,
            KaspiMode::App => CheckoutStep::Processing,
        };
        if self.step != CheckoutStep::Kaspi {
            return Err(CheckoutError::InvalidTransition {
                from: self.step,
                to: target,
            });
        }
        self.move_to(target)?;
        self.kaspi_mode = Some(mode);
        Ok(target)
    }

    pub fn complete(&mut self, receipt: PaymentReceipt) -> Result<CheckoutStep, CheckoutError> {
        self.move_to(CheckoutStep::Success)?;
        self.receipt = Some(receipt);
        Ok(CheckoutStep::Success)
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<CheckoutStep, CheckoutError> {
        self.move_to(CheckoutStep::Error)?;
        let message = message.into();
        self.error = Some(if message.trim().is_empty() {
            DEFAULT_FAILURE_MESSAGE.to_string()
        } else {
            message
        });
        Ok(CheckoutStep::Error)
    }

    /// The countdown ran out. Treated exactly like a gateway failure.
    pub fn time_out(&mut self) -> Result<CheckoutStep, CheckoutError> {
        self.fail(TIMEOUT_MESSAGE)
    }

    /// Abandon a payment that is waiting for confirmation.
    pub fn cancel(&mut self) -> Result<CheckoutStep, CheckoutError> {
        if !self.step.is_awaiting_payment() {
            return Err(CheckoutError::InvalidTransition {
                from: self.step,
                to: CheckoutStep::Method,
            });
        }
        self.reset_to_method()
    }

    /// Leave detail entry or the Kaspi chooser.
    pub fn back(&mut self) -> Result<CheckoutStep, CheckoutError> {
        if !matches!(self.step, CheckoutStep::Details | CheckoutStep::Kaspi) {
            return Err(CheckoutError::InvalidTransition {
                from: self.step,
                to: CheckoutStep::Method,
            });
        }
        self.reset_to_method()
    }

    /// After an error, card payers return to detail entry, others to
    /// method selection.
    pub fn retry(&mut self) -> Result<CheckoutStep, CheckoutError> {
        if self.step != CheckoutStep::Error {
            return Err(CheckoutError::InvalidTransition {
                from: self.step,
                to: CheckoutStep::Method,
            });
        }
        if self.method == Some(PaymentMethod::Card) {
            self.move_to(CheckoutStep::Details)?;
            self.error = None;
            return Ok(CheckoutStep::Details);
        }
        self.reset_to_method()
    }

    fn reset_to_method(&mut self) -> Result<CheckoutStep, CheckoutError> {
        self.move_to(CheckoutStep::Method)?;
        self.method = None;
        self.kaspi_mode = None;
        self.error = None;
        self.card_errors.clear();
        Ok(CheckoutStep::Method)
    }

    fn move_to(&mut self, target: CheckoutStep) -> Result<(), CheckoutError> {
        self.step = self
            .step
            .transition_to(target)
            .map_err(|_| CheckoutError::InvalidTransition {
                from: self.step,
                to: target,
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn valid_card() -> CardDetails {
        CardDetails {
            number: "4111 1111 1111 1111".to_string(),
            expiry_month: "12".to_string(),
            expiry_year: "2030".to_string(),
            cvv: "123".to_string(),
            cardholder_name: "AIGERIM N".to_string(),
        }
    }

    fn receipt() -> PaymentReceipt {
        PaymentReceipt::new(
            "pay-1",
            15_000,
            "KZT",
            PaymentMethod::Kaspi,
            "Basic package",
            Some("txn-1".to_string()),
            Timestamp::now(),
        )
    }

    // ══════════════════════════════════════════════════════════════
    // Card path
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn card_path_reaches_processing() {
        let mut flow = CheckoutFlow::new();
        assert_eq!(flow.select_method(PaymentMethod::Card), Ok(CheckoutStep::Details));
        assert_eq!(flow.submit_card(&valid_card(), today()), Ok(CheckoutStep::Processing));
        assert!(flow.card_errors().is_empty());
    }

    #[test]
    fn invalid_card_stays_on_details() {
        let mut flow = CheckoutFlow::new();
        flow.select_method(PaymentMethod::Card).unwrap();
        let mut card = valid_card();
        card.cvv = "1".to_string();

        let result = flow.submit_card(&card, today());

        assert!(matches!(result, Err(CheckoutError::InvalidCard(ref e)) if e.len() == 1));
        assert_eq!(flow.step(), CheckoutStep::Details);
        assert_eq!(flow.card_errors()[0].field(), "cvv");
    }

    #[test]
    fn submit_card_outside_details_is_rejected() {
        let mut flow = CheckoutFlow::new();
        let result = flow.submit_card(&valid_card(), today());
        assert_eq!(
            result,
            Err(CheckoutError::InvalidTransition {
                from: CheckoutStep::Method,
                to: CheckoutStep::Processing
            })
        );
    }

    #[test]
    fn card_retry_returns_to_details() {
        let mut flow = CheckoutFlow::new();
        flow.select_method(PaymentMethod::Card).unwrap();
        flow.submit_card(&valid_card(), today()).unwrap();
        flow.fail("Card declined by bank").unwrap();

        assert_eq!(flow.error_message(), Some("Card declined by bank"));
        assert_eq!(flow.retry(), Ok(CheckoutStep::Details));
        assert!(flow.error_message().is_none());
    }

    // ══════════════════════════════════════════════════════════════
    // Kaspi path
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn kaspi_qr_path_reaches_success() {
        let mut flow = CheckoutFlow::new();
        flow.select_method(PaymentMethod::Kaspi).unwrap();
        assert_eq!(flow.choose_kaspi_mode(KaspiMode::Qr), Ok(CheckoutStep::Qr));
        assert_eq!(flow.complete(receipt()), Ok(CheckoutStep::Success));
        assert_eq!(flow.receipt().unwrap().payment_id, "pay-1");
        assert!(flow.step().is_terminal());
    }

    #[test]
    fn kaspi_app_path_waits_in_processing() {
        let mut flow = CheckoutFlow::new();
        flow.select_method(PaymentMethod::Kaspi).unwrap();
        assert_eq!(flow.choose_kaspi_mode(KaspiMode::App), Ok(CheckoutStep::Processing));
        assert_eq!(flow.kaspi_mode(), Some(KaspiMode::App));
    }

    #[test]
    fn time_out_moves_to_error_with_message() {
        let mut flow = CheckoutFlow::new();
        flow.select_method(PaymentMethod::Kaspi).unwrap();
        flow.choose_kaspi_mode(KaspiMode::Qr).unwrap();

        assert_eq!(flow.time_out(), Ok(CheckoutStep::Error));
        assert_eq!(flow.error_message(), Some(TIMEOUT_MESSAGE));
    }

    #[test]
    fn blank_failure_message_gets_default() {
        let mut flow = CheckoutFlow::new();
        flow.select_method(PaymentMethod::Kaspi).unwrap();
        flow.choose_kaspi_mode(KaspiMode::Qr).unwrap();
        flow.fail("").unwrap();
        assert_eq!(flow.error_message(), Some(DEFAULT_FAILURE_MESSAGE));
    }

    #[test]
    fn cancel_from_qr_returns_to_method() {
        let mut flow = CheckoutFlow::new();
        flow.select_method(PaymentMethod::Kaspi).unwrap();
        flow.choose_kaspi_mode(KaspiMode::Qr).unwrap();

        assert_eq!(flow.cancel(), Ok(CheckoutStep::Method));
        assert!(flow.method().is_none());
        assert!(flow.kaspi_mode().is_none());
    }

    #[test]
    fn cancel_is_only_allowed_while_awaiting_payment() {
        let mut flow = CheckoutFlow::new();
        flow.select_method(PaymentMethod::Kaspi).unwrap();
        assert!(flow.cancel().is_err());
        assert_eq!(flow.step(), CheckoutStep::Kaspi);
    }

    #[test]
    fn kaspi_retry_returns_to_method() {
        let mut flow = CheckoutFlow::new();
        flow.select_method(PaymentMethod::Kaspi).unwrap();
        flow.fail("Gateway unavailable").unwrap();
        assert_eq!(flow.retry(), Ok(CheckoutStep::Method));
    }

    #[test]
    fn back_from_details_clears_method() {
        let mut flow = CheckoutFlow::new();
        flow.select_method(PaymentMethod::Card).unwrap();
        assert_eq!(flow.back(), Ok(CheckoutStep::Method));
        assert!(flow.method().is_none());
    }

    #[test]
    fn success_cannot_fail_afterwards() {
        let mut flow = CheckoutFlow::new();
        flow.select_method(PaymentMethod::Kaspi).unwrap();
        flow.choose_kaspi_mode(KaspiMode::Qr).unwrap();
        flow.complete(receipt()).unwrap();

        assert!(flow.time_out().is_err());
        assert_eq!(flow.step(), CheckoutStep::Success);
    }
}
