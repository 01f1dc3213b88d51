//! CheckoutOrchestrator - drives a checkout from method selection to outcome.
//!
//! Owns a `CheckoutFlow` and performs the side effects the flow itself
//! cannot: creating the Kaspi payment, polling its status, running the
//! countdown, charging cards and cancelling abandoned payments.
//!
//! Step changes are published on a `watch` channel. A `CancelHandle` lets
//! another task abandon a payment that is waiting for confirmation; a cancel
//! requested while nothing is waiting is ignored.
//!
//! The orchestrator never touches subscriptions. Activation happens server
//! side when the payment service observes the completion.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::futures::Notified;
use tokio::sync::{watch, Notify};
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};

use crate::domain::checkout::{
    CardDetails, CheckoutError, CheckoutFlow, CheckoutStep, KaspiMode, PaymentMethod,
    PaymentReceipt, DEFAULT_FAILURE_MESSAGE, TIMEOUT_MESSAGE,
};
use crate::domain::foundation::{Timestamp, ValidationError};
use crate::domain::payment::{PaymentStatus, TrainingPackage};
use crate::ports::{
    CardChargeRequest, CardProcessor, CheckoutBackend, CheckoutRequest, CreatedPayment,
};

/// Timing of a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Delay between status polls.
    pub poll_interval: Duration,
    /// How long to wait for confirmation before giving up.
    pub timeout: Duration,
    /// Pause on the success step before handing back the receipt.
    pub success_delay: Duration,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
            timeout: Duration::from_secs(300),
            success_delay: Duration::from_secs(2),
        }
    }
}

/// How a payment attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Succeeded(PaymentReceipt),
    Failed { message: String },
    TimedOut { message: String },
    /// The payer abandoned the payment; the flow is back on method selection.
    Cancelled,
    /// Card input was rejected; the flow stays on detail entry.
    InvalidDetails(Vec<ValidationError>),
}

/// Cancels the payment an orchestrator is waiting on.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    notify: Arc<Notify>,
}

impl CancelHandle {
    /// Only a payment already waiting for confirmation is cancelled.
    pub fn cancel(&self) {
        self.notify.notify_waiters();
    }
}

pub struct CheckoutOrchestrator {
    backend: Arc<dyn CheckoutBackend>,
    card_processor: Arc<dyn CardProcessor>,
    config: CheckoutConfig,
    flow: CheckoutFlow,
    steps: watch::Sender<CheckoutStep>,
    cancel: Arc<Notify>,
}

impl CheckoutOrchestrator {
    pub fn new(
        backend: Arc<dyn CheckoutBackend>,
        card_processor: Arc<dyn CardProcessor>,
        config: CheckoutConfig,
    ) -> Self {
        let flow = CheckoutFlow::new();
        let (steps, _) = watch::channel(flow.step());
        Self {
            backend,
            card_processor,
            config,
            flow,
            steps,
            cancel: Arc::new(Notify::new()),
        }
    }

    pub fn flow(&self) -> &CheckoutFlow {
        &self.flow
    }

    /// Receiver that sees every step change.
    pub fn subscribe(&self) -> watch::Receiver<CheckoutStep> {
        self.steps.subscribe()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            notify: self.cancel.clone(),
        }
    }

    pub fn select_method(&mut self, method: PaymentMethod) -> Result<CheckoutStep, CheckoutError> {
        let step = self.flow.select_method(method)?;
        self.publish();
        Ok(step)
    }

    pub fn back(&mut self) -> Result<CheckoutStep, CheckoutError> {
        let step = self.flow.back()?;
        self.publish();
        Ok(step)
    }

    pub fn retry(&mut self) -> Result<CheckoutStep, CheckoutError> {
        let step = self.flow.retry()?;
        self.publish();
        Ok(step)
    }

    /// Start a Kaspi payment and wait for it to settle.
    ///
    /// Must be called on the `Kaspi` step. A payment the service refuses to
    /// create ends the attempt with `Failed`.
    pub async fn pay_with_kaspi(
        &mut self,
        request: &CheckoutRequest,
        mode: KaspiMode,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        if self.flow.step() != CheckoutStep::Kaspi {
            return Err(CheckoutError::InvalidTransition {
                from: self.flow.step(),
                to: match mode {
                    KaspiMode::Qr => CheckoutStep::Qr,
                    KaspiMode::App => CheckoutStep::Processing,
                },
            });
        }

        let created = match self.backend.create_payment(request).await {
            Ok(created) => created,
            Err(e) => {
                tracing::warn!(
                    package_id = %request.package_id,
                    error = %e,
                    "Could not create Kaspi payment"
                );
                return self.fail(e.user_message());
            }
        };

        // Listen for cancels before the payer can see the QR step.
        let cancel = self.cancel.clone();
        let cancelled = cancel.notified();
        tokio::pin!(cancelled);
        cancelled.as_mut().enable();

        self.flow.choose_kaspi_mode(mode)?;
        self.publish();
        tracing::debug!(payment_id = %created.payment_id, ?mode, "Waiting for Kaspi confirmation");

        self.await_confirmation(&created, cancelled).await
    }

    /// Validate the card and charge it.
    ///
    /// Must be called on the `Details` step.
    pub async fn pay_with_card(
        &mut self,
        package: &TrainingPackage,
        card: &CardDetails,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let today = Utc::now().date_naive();
        match self.flow.submit_card(card, today) {
            Ok(_) => self.publish(),
            Err(CheckoutError::InvalidCard(errors)) => {
                return Ok(CheckoutOutcome::InvalidDetails(errors))
            }
            Err(e) => return Err(e),
        }

        let charge = self
            .card_processor
            .charge(CardChargeRequest {
                amount: package.price,
                currency: package.currency.clone(),
                description: package.payment_description(),
                card: card.clone(),
            })
            .await;

        match charge {
            Ok(authorization) => {
                let receipt = PaymentReceipt::new(
                    authorization.payment_id,
                    package.price,
                    package.currency.clone(),
                    PaymentMethod::Card,
                    package.name.clone(),
                    Some(authorization.transaction_id),
                    Timestamp::now(),
                );
                self.succeed(receipt).await
            }
            Err(decline) => {
                tracing::info!(card = %card.masked_number(), reason = %decline, "Card charge declined");
                self.fail(decline.to_string())
            }
        }
    }

    /// Poll until the payment settles, the countdown runs out, or the payer
    /// cancels. A poll still in flight does not hold back the other two.
    async fn await_confirmation(
        &mut self,
        created: &CreatedPayment,
        mut cancelled: Pin<&mut Notified<'_>>,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let deadline = sleep(self.config.timeout);
        tokio::pin!(deadline);
        let mut ticker = interval_at(
            Instant::now() + self.config.poll_interval,
            self.config.poll_interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let polled = tokio::select! {
                biased;

                _ = cancelled.as_mut() => return self.abandon(created).await,
                _ = &mut deadline => return self.expire(created),
                _ = ticker.tick() => tokio::select! {
                    biased;

                    _ = cancelled.as_mut() => return self.abandon(created).await,
                    _ = &mut deadline => return self.expire(created),
                    polled = self.backend.payment_status(&created.payment_id) => polled,
                },
            };

            let report = match polled {
                Ok(report) => report,
                Err(e) => {
                    tracing::warn!(
                        payment_id = %created.payment_id,
                        error = %e,
                        "Status poll failed"
                    );
                    continue;
                }
            };

            match report.status {
                PaymentStatus::Pending => continue,
                PaymentStatus::Completed => {
                    let receipt = PaymentReceipt::new(
                        report.payment_id,
                        report.amount,
                        report.currency,
                        PaymentMethod::Kaspi,
                        created.package_name.clone(),
                        report.transaction_id,
                        report.completed_at.unwrap_or_else(Timestamp::now),
                    );
                    return self.succeed(receipt).await;
                }
                status => return self.fail(failure_message(status)),
            }
        }
    }

    async fn abandon(&mut self, created: &CreatedPayment) -> Result<CheckoutOutcome, CheckoutError> {
        if let Err(e) = self.backend.cancel_payment(&created.payment_id).await {
            tracing::warn!(
                payment_id = %created.payment_id,
                error = %e,
                "Best-effort cancel failed"
            );
        }
        self.flow.cancel()?;
        self.publish();
        Ok(CheckoutOutcome::Cancelled)
    }

    fn expire(&mut self, created: &CreatedPayment) -> Result<CheckoutOutcome, CheckoutError> {
        tracing::warn!(
            payment_id = %created.payment_id,
            timeout_secs = self.config.timeout.as_secs(),
            "Payment confirmation timed out"
        );
        self.flow.time_out()?;
        self.publish();
        Ok(CheckoutOutcome::TimedOut {
            message: TIMEOUT_MESSAGE.to_string(),
        })
    }

    async fn succeed(&mut self, receipt: PaymentReceipt) -> Result<CheckoutOutcome, CheckoutError> {
        self.flow.complete(receipt.clone())?;
        self.publish();
        sleep(self.config.success_delay).await;
        Ok(CheckoutOutcome::Succeeded(receipt))
    }

    fn fail(&mut self, message: String) -> Result<CheckoutOutcome, CheckoutError> {
        self.flow.fail(message)?;
        self.publish();
        let message = self
            .flow
            .error_message()
            .unwrap_or(DEFAULT_FAILURE_MESSAGE)
            .to_string();
        Ok(CheckoutOutcome::Failed { message })
    }

    fn publish(&self) {
        self.steps.send_replace(self.flow.step());
    }
}

fn failure_message(status: PaymentStatus) -> String {
    match status {
        PaymentStatus::Cancelled => "Payment was cancelled".to_string(),
        PaymentStatus::Expired => "Payment expired".to_string(),
        _ => DEFAULT_FAILURE_MESSAGE.to_string(),
    }
}
