//! Error types for PIN verification.
//!
//! - Offline is detected before the credential source is consulted
//! - Transport failures keep the HTTP status when one was received
//! - `user_message()` is the text raised on the error signal, separate from `Display`

use super::{FALLBACK_LOGIN_MESSAGE, INVALID_PIN_MESSAGE, OFFLINE_MESSAGE};

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum AuthError {
    #[error("Offline Error: {message} {location}")]
    Offline {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid Credential Error: {message} {location}")]
    InvalidCredential {
        message: String,
        location: ErrorLocation,
    },

    #[error("Transport Error: {message} {location}")]
    Transport {
        message: String,
        status_code: Option<HttpStatusCode>,
        location: ErrorLocation,
    },

    #[error("Credential Format Error: {message} {location}")]
    Format {
        message: String,
        location: ErrorLocation,
    },
}

impl AuthError {
    #[track_caller]
    pub fn offline() -> Self {
        AuthError::Offline {
            message: OFFLINE_MESSAGE.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_credential() -> Self {
        AuthError::InvalidCredential {
            message: INVALID_PIN_MESSAGE.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn from_http_response(status_code: u16, body: impl Into<String>) -> Self {
        AuthError::Transport {
            message: format!("HTTP {} - {}", status_code, body.into()),
            status_code: Some(HttpStatusCode(status_code)),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Text surfaced to the user on the error signal.
    pub fn user_message(&self) -> &str {
        match self {
            AuthError::Offline { message, .. } => message,
            AuthError::InvalidCredential { message, .. } => message,
            AuthError::Transport { .. } | AuthError::Format { .. } => FALLBACK_LOGIN_MESSAGE,
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, AuthError::Offline { .. })
    }

    pub fn is_invalid_credential(&self) -> bool {
        matches!(self, AuthError::InvalidCredential { .. })
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            AuthError::Transport {
                status_code: Some(status_code),
                ..
            } => Some(status_code.0),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AuthError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        AuthError::Transport {
            message: error.to_string(),
            status_code: error.status().map(|s| HttpStatusCode(s.as_u16())),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for AuthError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        AuthError::Format {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<url::ParseError> for AuthError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        AuthError::Format {
            message: format!("invalid credential endpoint: {error}"),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
