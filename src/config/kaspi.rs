//! Kaspi Pay gateway configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Kaspi Pay merchant configuration
#[derive(Debug, Clone, Deserialize)]
pub struct KaspiConfig {
    /// Base URL of the Kaspi QR API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Merchant identifier issued by Kaspi
    #[serde(default)]
    pub merchant_id: String,

    /// Shared secret used to sign requests and verify webhooks
    #[serde(default = "empty_secret")]
    pub secret_key: SecretString,

    /// Where Kaspi sends the payer after a successful payment
    #[serde(default = "default_success_url")]
    pub success_url: String,

    /// Where Kaspi sends the payer after a failed payment
    #[serde(default = "default_failure_url")]
    pub failure_url: String,

    /// Timeout for payment creation calls, in seconds
    #[serde(default = "default_create_timeout")]
    pub create_timeout_secs: u64,

    /// Timeout for status and cancel calls, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl KaspiConfig {
    pub fn create_timeout(&self) -> Duration {
        Duration::from_secs(self.create_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// Validate Kaspi configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.merchant_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("KASPI_MERCHANT_ID"));
        }
        if self.secret_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("KASPI_SECRET_KEY"));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ValidationError::InvalidKaspiUrl);
        }
        if self.create_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for KaspiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            merchant_id: String::new(),
            secret_key: empty_secret(),
            success_url: default_success_url(),
            failure_url: default_failure_url(),
            create_timeout_secs: default_create_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_api_url() -> String {
    "https://kaspi.kz/qr/api/v1".to_string()
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

fn default_success_url() -> String {
    "http://localhost:3000/payments/success".to_string()
}

fn default_failure_url() -> String {
    "http://localhost:3000/payments/failure".to_string()
}

fn default_create_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    10
}
