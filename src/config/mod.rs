//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `TRAINER_PAY_` prefix and nested values use double underscores as separators.
//! The merchant credentials may also be given through the plain `KASPI_*`
//! variables, which take precedence.
//!
//! # Example
//!
//! ```no_run
//! use trainer_payments::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod error;
mod kaspi;
mod server;

pub use error::{ConfigError, ValidationError};
pub use kaspi::KaspiConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Plain environment variables mapped onto the `kaspi` section.
const KASPI_ENV_KEYS: [(&str, &str); 5] = [
    ("KASPI_API_URL", "kaspi.api_url"),
    ("KASPI_MERCHANT_ID", "kaspi.merchant_id"),
    ("KASPI_SECRET_KEY", "kaspi.secret_key"),
    ("KASPI_SUCCESS_URL", "kaspi.success_url"),
    ("KASPI_FAILURE_URL", "kaspi.failure_url"),
];

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Kaspi Pay merchant configuration
    #[serde(default)]
    pub kaspi: KaspiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `TRAINER_PAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Overlays the plain `KASPI_*` variables
    /// 5. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `TRAINER_PAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `KASPI_MERCHANT_ID=...` -> `kaspi.merchant_id = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder().add_source(
            config::Environment::default()
                .prefix("TRAINER_PAY")
                .separator("__"),
        );
        for (var, key) in KASPI_ENV_KEYS {
            builder = builder.set_override_option(key, std::env::var(var).ok())?;
        }

        let config = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.kaspi.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("KASPI_MERCHANT_ID", "merchant-42");
        env::set_var("KASPI_SECRET_KEY", "top-secret");
    }

    fn clear_env() {
        for (var, _) in KASPI_ENV_KEYS {
            env::remove_var(var);
        }
        env::remove_var("TRAINER_PAY__SERVER__PORT");
        env::remove_var("TRAINER_PAY__SERVER__ENVIRONMENT");
        env::remove_var("TRAINER_PAY__KASPI__MERCHANT_ID");
        env::remove_var("TRAINER_PAY__KASPI__REQUEST_TIMEOUT_SECS");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.kaspi.merchant_id, "merchant-42");
        assert_eq!(config.kaspi.secret_key.expose_secret(), "top-secret");
        assert_eq!(config.kaspi.api_url, "https://kaspi.kz/qr/api/v1");
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().validate().is_ok());
    }

    #[test]
    fn test_missing_credentials_fail_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        let config = result.unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn test_prefixed_variables_configure_nested_sections() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("TRAINER_PAY__SERVER__PORT", "3000");
        env::set_var("TRAINER_PAY__SERVER__ENVIRONMENT", "production");
        env::set_var("TRAINER_PAY__KASPI__REQUEST_TIMEOUT_SECS", "5");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert_eq!(config.kaspi.request_timeout_secs, 5);
    }

    #[test]
    fn test_plain_kaspi_variables_take_precedence() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("TRAINER_PAY__KASPI__MERCHANT_ID", "from-prefixed");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(result.unwrap().kaspi.merchant_id, "merchant-42");
    }
}
