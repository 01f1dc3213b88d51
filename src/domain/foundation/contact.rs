//! Contact value objects captured at checkout.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Email address with a minimal shape check (`local@domain.tld`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(ValidationError::empty_field("client_email"));
        }

        let (local, domain) = value
            .split_once('@')
            .ok_or_else(|| ValidationError::invalid_format("client_email", "missing @ symbol"))?;

        if local.is_empty() || domain.contains('@') || value.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid_format(
                "client_email",
                "not a valid email address",
            ));
        }

        match domain.rsplit_once('.') {
            Some((host, tld)) if !host.is_empty() && tld.len() >= 2 => Ok(Self(value)),
            _ => Err(ValidationError::invalid_format(
                "client_email",
                "domain must contain a top-level domain",
            )),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mobile phone number.
///
/// Accepts an optional leading `+` and 10 to 15 digits; spaces, dashes and
/// parentheses are ignored. The value is kept as typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(ValidationError::empty_field("client_phone"));
        }

        let body = value.strip_prefix('+').unwrap_or(&value);
        let mut digits = 0usize;
        for c in body.chars() {
            match c {
                '0'..='9' => digits += 1,
                ' ' | '-' | '(' | ')' => {}
                _ => {
                    return Err(ValidationError::invalid_format(
                        "client_phone",
                        format!("unexpected character '{}'", c),
                    ))
                }
            }
        }

        if !(10..=15).contains(&digits) {
            return Err(ValidationError::out_of_range(
                "client_phone",
                10,
                15,
                digits as i64,
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
