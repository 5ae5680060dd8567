//! Error types for the two-step login flow.

use super::{AuthError, FALLBACK_LOGIN_MESSAGE, StoreError};
use crate::login::LoginStepKind;

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum LoginError {
    #[error("Validation Error: {reason} {location}")]
    Validation {
        reason: ValidationFailure,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Commit Error: {source} {location}")]
    Commit {
        #[source]
        source: StoreError,
        location: ErrorLocation,
    },

    #[error("Busy Error: a login operation is already in flight {location}")]
    Busy { location: ErrorLocation },

    #[error("Step Error: expected {expected}, current step is {actual} {location}")]
    WrongStep {
        expected: LoginStepKind,
        actual: LoginStepKind,
        location: ErrorLocation,
    },
}

/// Local form validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    Pin(PinValidationFailure),
    Password(PasswordValidationFailure),
}

/// PIN form failures, checked in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinValidationFailure {
    Missing,
    NonNumeric,
    TooShort { min: usize, actual: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordValidationFailure {
    Missing,
    TooShort { min: usize, actual: usize },
}

impl std::fmt::Display for PinValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "Please enter PIN."),
            Self::NonNumeric => write!(f, "PIN must contain only numbers."),
            Self::TooShort { min, .. } => write!(f, "PIN must be at least {} digits.", min),
        }
    }
}

impl std::fmt::Display for PasswordValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "Please enter your password."),
            Self::TooShort { min, .. } => {
                write!(f, "Password must be at least {} characters.", min)
            }
        }
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pin(reason) => write!(f, "{}", reason),
            Self::Password(reason) => write!(f, "{}", reason),
        }
    }
}

impl LoginError {
    #[track_caller]
    pub fn validation(reason: ValidationFailure) -> Self {
        LoginError::Validation {
            reason,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn commit(source: StoreError) -> Self {
        LoginError::Commit {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn busy() -> Self {
        LoginError::Busy {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn wrong_step(expected: LoginStepKind, actual: LoginStepKind) -> Self {
        LoginError::WrongStep {
            expected,
            actual,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Text raised on the error signal, or `None` for failures the user never sees
    /// (an ignored resubmission, a call on the wrong step).
    pub fn user_message(&self) -> Option<String> {
        match self {
            LoginError::Validation { reason, .. } => Some(reason.to_string()),
            LoginError::Auth(error) => Some(error.user_message().to_string()),
            LoginError::Commit { .. } => Some(FALLBACK_LOGIN_MESSAGE.to_string()),
            LoginError::Busy { .. } | LoginError::WrongStep { .. } => None,
        }
    }

    pub fn validation_failure(&self) -> Option<&ValidationFailure> {
        match self {
            LoginError::Validation { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// Get error category for logging.
    pub fn error_category(&self) -> &'static str {
        match self {
            LoginError::Validation { .. } => "validation",
            LoginError::Auth(AuthError::Offline { .. }) => "offline",
            LoginError::Auth(AuthError::InvalidCredential { .. }) => "invalid_credential",
            LoginError::Auth(_) => "transport",
            LoginError::Commit { .. } => "commit",
            LoginError::Busy { .. } => "busy",
            LoginError::WrongStep { .. } => "wrong_step",
        }
    }
}
