//! Payment domain.
//!
//! Payments for training packages settled through Kaspi QR: the package
//! catalog, the payment aggregate and its status machine, payload signing and
//! webhook verification.

mod aggregate;
mod errors;
mod notification;
mod package;
mod signature;
mod status;
mod webhook_verifier;

pub use aggregate::{Payer, Payment, QrCheckout, StatusChange};
pub use errors::PaymentError;
pub use notification::{deserialize_gateway_time, parse_gateway_time, KaspiNotification};
pub use package::{
    PackageCatalog, SessionAllowance, TrainingPackage, DEFAULT_CURRENCY,
    UNLIMITED_SESSION_CREDIT,
};
pub use signature::{canonical_string, PayloadSigner, SIGNATURE_FIELD};
pub use status::{PaymentStatus, UnknownPaymentStatus};
pub use webhook_verifier::{KaspiWebhookVerifier, WebhookError, SIGNATURE_HEADER};

#[cfg(test)]
pub(crate) use aggregate::test_support;
