//! Form validation for the two login steps.
//!
//! Runs before any network call so obviously bad input never reaches the
//! credential source.

use crate::error::{PasswordValidationFailure, PinValidationFailure};

use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_PIN_LENGTH: usize = 4;
pub const MIN_PASSWORD_LENGTH: usize = 4;

static NUMERIC_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]*$").expect("numeric pattern is a valid regex"));

/// Validate a PIN. Reports missing, then non-numeric, then too short.
pub fn validate_pin(pin: &str) -> Result<(), PinValidationFailure> {
    if pin.is_empty() {
        return Err(PinValidationFailure::Missing);
    }

    if !NUMERIC_ONLY.is_match(pin) {
        return Err(PinValidationFailure::NonNumeric);
    }

    let actual = pin.chars().count();
    if actual < MIN_PIN_LENGTH {
        return Err(PinValidationFailure::TooShort {
            min: MIN_PIN_LENGTH,
            actual,
        });
    }

    Ok(())
}

/// Validate a password. Any content is accepted once it is long enough.
pub fn validate_password(password: &str) -> Result<(), PasswordValidationFailure> {
    if password.is_empty() {
        return Err(PasswordValidationFailure::Missing);
    }

    let actual = password.chars().count();
    if actual < MIN_PASSWORD_LENGTH {
        return Err(PasswordValidationFailure::TooShort {
            min: MIN_PASSWORD_LENGTH,
            actual,
        });
    }

    Ok(())
}
