//! Kaspi webhook signature verification.
//!
//! The webhook body is a JSON object; the signature arrives in the
//! `x-kaspi-signature` header and is recomputed over the parsed body with the
//! same function used for outbound requests.

use serde_json::{Map, Value};
use thiserror::Error;

use super::notification::KaspiNotification;
use super::signature::PayloadSigner;

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "x-kaspi-signature";

/// Errors that occur while authenticating a webhook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    #[error("Missing signature header")]
    MissingSignature,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl WebhookError {
    /// True for errors that mean the caller is not who it claims to be.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            WebhookError::MissingSignature | WebhookError::InvalidSignature
        )
    }
}

/// Verifier for Kaspi webhook signatures.
#[derive(Debug, Clone)]
pub struct KaspiWebhookVerifier {
    signer: PayloadSigner,
}

impl KaspiWebhookVerifier {
    pub fn new(signer: PayloadSigner) -> Self {
        Self { signer }
    }

    /// Returns true when `signature` matches `payload`.
    pub fn verify(&self, payload: &Map<String, Value>, signature: &str) -> bool {
        self.signer.verify(payload, signature)
    }

    /// Verifies the webhook signature and parses the notification.
    ///
    /// # Errors
    ///
    /// - `MissingSignature` - no signature header was sent
    /// - `ParseError` - body is not a JSON object or lacks required fields
    /// - `InvalidSignature` - recomputed signature differs
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<KaspiNotification, WebhookError> {
        let signature = signature
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(WebhookError::MissingSignature)?;

        let body: Map<String, Value> = serde_json::from_slice(payload)
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        if !self.verify(&body, signature) {
            return Err(WebhookError::InvalidSignature);
        }

        serde_json::from_value(Value::Object(body))
            .map_err(|e| WebhookError::ParseError(e.to_string()))
    }
}
