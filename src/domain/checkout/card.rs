//! Card details captured on the `details` step.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Numbers accepted without a checksum so QA can exercise each scheme.
pub const TEST_CARD_NUMBERS: [&str; 4] = [
    "4111111111111111", // Visa
    "5555555555554444", // MasterCard
    "378282246310005",  // American Express
    "4000000000000002", // Always declined
];

/// Raw card input. Fields are kept as typed by the payer.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    pub number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
    pub cardholder_name: String,
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &self.masked_number())
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cardholder_name", &self.cardholder_name)
            .finish_non_exhaustive()
    }
}

impl CardDetails {
    /// Card number with whitespace removed.
    pub fn normalized_number(&self) -> String {
        self.number.chars().filter(|c| !c.is_whitespace()).collect()
    }

    /// Last four digits, or fewer for short input.
    pub fn last4(&self) -> String {
        let digits = self.normalized_number();
        let start = digits.len().saturating_sub(4);
        digits[start..].to_string()
    }

    pub fn masked_number(&self) -> String {
        format!("**** {}", self.last4())
    }

    /// Checks every field and reports all problems at once.
    ///
    /// `today` decides whether the card has expired.
    pub fn validate(&self, today: NaiveDate) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let number = self.normalized_number();
        if number.is_empty() {
            errors.push(ValidationError::empty_field("card_number"));
        } else if !(13..=19).contains(&number.len()) || !is_all_digits(&number) {
            errors.push(ValidationError::invalid_format(
                "card_number",
                "must be 13 to 19 digits",
            ));
        } else if !TEST_CARD_NUMBERS.contains(&number.as_str()) && !passes_luhn(&number) {
            errors.push(ValidationError::invalid_format(
                "card_number",
                "checksum does not match",
            ));
        }

        let cvv = self.cvv.trim();
        if cvv.is_empty() {
            errors.push(ValidationError::empty_field("cvv"));
        } else if !(3..=4).contains(&cvv.len()) || !is_all_digits(cvv) {
            errors.push(ValidationError::invalid_format("cvv", "must be 3 or 4 digits"));
        }

        let month = parse_month(self.expiry_month.trim(), &mut errors);
        let year = parse_year(self.expiry_year.trim(), &mut errors);
        if let (Some(month), Some(year)) = (month, year) {
            let current = (today.year(), today.month());
            if (year, month) < current {
                errors.push(ValidationError::invalid_format("expiry", "card has expired"));
            }
        }

        if self.cardholder_name.trim().is_empty() {
            errors.push(ValidationError::empty_field("cardholder_name"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn parse_month(value: &str, errors: &mut Vec<ValidationError>) -> Option<u32> {
    if value.is_empty() {
        errors.push(ValidationError::empty_field("expiry_month"));
        return None;
    }
    match value.parse::<u32>() {
        Ok(m) if (1..=12).contains(&m) => Some(m),
        Ok(m) => {
            errors.push(ValidationError::out_of_range("expiry_month", 1, 12, m as i64));
            None
        }
        Err(_) => {
            errors.push(ValidationError::invalid_format("expiry_month", "not a number"));
            None
        }
    }
}

fn parse_year(value: &str, errors: &mut Vec<ValidationError>) -> Option<i32> {
    if value.is_empty() {
        errors.push(ValidationError::empty_field("expiry_year"));
        return None;
    }
    if value.len() != 4 || !is_all_digits(value) {
        errors.push(ValidationError::invalid_format(
            "expiry_year",
            "must be a four-digit year",
        ));
        return None;
    }
    value.parse().ok()
}

fn is_all_digits(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_digit())
}

/// Luhn checksum over an all-digit string.
pub fn passes_luhn(number: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in number.chars().rev().enumerate() {
        let Some(mut digit) = c.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }
    sum % 10 == 0
}
