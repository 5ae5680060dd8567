//! Error types for authorized outbound requests.
//!
//! Every failure is classified exactly once, as offline or generic, and keeps
//! the original failure reachable through `failure()` and `source()`.

use super::{GENERIC_REQUEST_MESSAGE, OFFLINE_MESSAGE, StoreError};

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

/// The underlying reason an authorized request failed.
#[derive(Debug, ThisError)]
pub enum RequestFailure {
    #[error("transport failure: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP {status_code} - {body}")]
    Status {
        status_code: HttpStatusCode,
        body: String,
    },

    #[error("response body unreadable: {0}")]
    Body(#[source] reqwest::Error),

    #[error("session token unavailable: {0}")]
    TokenRead(#[source] StoreError),
}

impl RequestFailure {
    pub fn status_code(&self) -> Option<HttpStatusCode> {
        match self {
            RequestFailure::Status { status_code, .. } => Some(*status_code),
            RequestFailure::Transport(error) => {
                error.status().map(|s| HttpStatusCode(s.as_u16()))
            }
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RequestFailure::Transport(error) if error.is_timeout())
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            _ if self.is_timeout() => "timeout",
            RequestFailure::Transport(_) => "transport",
            RequestFailure::Status { status_code, .. } if status_code.is_auth_rejection() => {
                "auth rejected"
            }
            RequestFailure::Status { status_code, .. } if status_code.is_client_error() => {
                "client error"
            }
            RequestFailure::Status { status_code, .. } if status_code.is_server_error() => {
                "server error"
            }
            RequestFailure::Status { .. } => "unexpected status",
            RequestFailure::Body(_) => "body",
            RequestFailure::TokenRead(_) => "token read",
        }
    }
}

#[derive(Debug, ThisError)]
pub enum RequestError {
    #[error("Offline Error: {failure} {location}")]
    Offline {
        #[source]
        failure: RequestFailure,
        location: ErrorLocation,
    },

    #[error("Request Error: {failure} {location}")]
    Generic {
        #[source]
        failure: RequestFailure,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    /// The path resolved to a URL outside the data provider.
    #[error("Foreign Origin Error: {url} is not under {base_url} {location}")]
    ForeignOrigin {
        url: String,
        base_url: String,
        location: ErrorLocation,
    },
}

impl RequestError {
    #[track_caller]
    pub fn offline(failure: RequestFailure) -> Self {
        RequestError::Offline {
            failure,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn generic(failure: RequestFailure) -> Self {
        RequestError::Generic {
            failure,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// The original failure, when the request reached classification.
    pub fn failure(&self) -> Option<&RequestFailure> {
        match self {
            RequestError::Offline { failure, .. } | RequestError::Generic { failure, .. } => {
                Some(failure)
            }
            RequestError::UrlParse { .. } | RequestError::ForeignOrigin { .. } => None,
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, RequestError::Offline { .. })
    }

    #[track_caller]
    pub fn foreign_origin(url: &url::Url, base_url: &url::Url) -> Self {
        RequestError::ForeignOrigin {
            url: url.to_string(),
            base_url: base_url.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        self.failure()
            .and_then(RequestFailure::status_code)
            .map(|status_code| status_code.0)
    }

    /// Text raised on the error signal for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            RequestError::Offline { .. } => OFFLINE_MESSAGE,
            _ => GENERIC_REQUEST_MESSAGE,
        }
    }
}

impl From<url::ParseError> for RequestError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        RequestError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
