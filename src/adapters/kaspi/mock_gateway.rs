//! Mock payment gateway for testing.
//!
//! Provides a configurable mock implementation of `PaymentGateway` for unit
//! and integration tests. Supports:
//! - Pre-configured QR checkouts and per-payment statuses
//! - Error injection
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::foundation::Timestamp;
use crate::domain::payment::{PaymentStatus, QrCheckout};
use crate::ports::{
    CancellationAck, CreateQrPaymentRequest, GatewayError, GatewayPaymentStatus, PaymentGateway,
};

/// Mock payment gateway for testing.
///
/// # Example
///
/// ```ignore
/// let gateway = MockPaymentGateway::new();
///
/// // Payments are pending until told otherwise
/// gateway.set_payment_status("kaspi_1", PaymentStatus::Completed);
///
/// // Inject errors
/// gateway.set_method_error("create_qr_payment", GatewayError::rejected("Merchant blocked"));
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Checkout to return on next `create_qr_payment` call.
    next_checkout: Option<QrCheckout>,

    /// Reported status by gateway payment id.
    statuses: HashMap<String, GatewayPaymentStatus>,

    /// Error to return on next call.
    next_error: Option<GatewayError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, GatewayError>,

    /// Every create request received.
    create_requests: Vec<CreateQrPaymentRequest>,

    call_log: Vec<MethodCall>,

    issued: u64,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Set the checkout to return on next `create_qr_payment` call.
    pub fn set_checkout(&self, checkout: QrCheckout) {
        self.state().next_checkout = Some(checkout);
    }

    /// Report `status` for a payment from now on.
    pub fn set_payment_status(&self, gateway_payment_id: &str, status: PaymentStatus) {
        self.set_status_report(gateway_payment_id, GatewayPaymentStatus::with_status(status));
    }

    /// Report a full status (with settlement details) for a payment.
    pub fn set_status_report(&self, gateway_payment_id: &str, report: GatewayPaymentStatus) {
        self.state()
            .statuses
            .insert(gateway_payment_id.to_string(), report);
    }

    /// Set an error to return on the next call of any method.
    pub fn set_error(&self, error: GatewayError) {
        self.state().next_error = Some(error);
    }

    /// Set an error for a specific method until cleared.
    pub fn set_method_error(&self, method: &str, error: GatewayError) {
        self.state().method_errors.insert(method.to_string(), error);
    }

    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Assertion Helpers
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_log.iter().any(|c| c.method == method)
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Create requests received so far, oldest first.
    pub fn create_requests(&self) -> Vec<CreateQrPaymentRequest> {
        self.state().create_requests.clone()
    }

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.state().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), GatewayError> {
        let mut state = self.state();
        if let Some(err) = state.next_error.take() {
            return Err(err);
        }
        if let Some(err) = state.method_errors.get(method) {
            return Err(err.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_qr_payment(
        &self,
        request: CreateQrPaymentRequest,
    ) -> Result<QrCheckout, GatewayError> {
        self.record_call(
            "create_qr_payment",
            vec![request.order_id.to_string(), request.amount.to_string()],
        );
        self.check_error("create_qr_payment")?;

        let mut state = self.state();
        state.create_requests.push(request);
        if let Some(checkout) = state.next_checkout.take() {
            return Ok(checkout);
        }
        state.issued += 1;
        let id = format!("kaspi_{}", state.issued);
        Ok(QrCheckout {
            qr_code: format!("https://qr.kaspi.kz/{}", id),
            qr_image: Some(format!("data:image/png;base64,{}", id)),
            deeplink: Some(format!("kaspi://pay/{}", id)),
            expires_at: Some(Timestamp::now().plus_secs(15 * 60)),
            gateway_payment_id: id,
        })
    }

    async fn check_payment_status(
        &self,
        gateway_payment_id: &str,
    ) -> Result<GatewayPaymentStatus, GatewayError> {
        self.record_call("check_payment_status", vec![gateway_payment_id.to_string()]);
        self.check_error("check_payment_status")?;

        Ok(self
            .state()
            .statuses
            .get(gateway_payment_id)
            .cloned()
            .unwrap_or_else(|| GatewayPaymentStatus::with_status(PaymentStatus::Pending)))
    }

    async fn cancel_payment(
        &self,
        gateway_payment_id: &str,
    ) -> Result<CancellationAck, GatewayError> {
        self.record_call("cancel_payment", vec![gateway_payment_id.to_string()]);
        self.check_error("cancel_payment")?;

        self.set_payment_status(gateway_payment_id, PaymentStatus::Cancelled);
        Ok(CancellationAck {
            message: Some("Payment cancelled".to_string()),
        })
    }
}
