//! Credential sources for PIN verification.
//!
//! A credential source returns the whole PIN table; matching happens in the
//! authentication service. The table shape is the same for the bundled static
//! resource and the API endpoint: `{ "pins": [{ "pin", "token", "user" }] }`.

mod http;
mod static_source;

pub use http::HttpCredentialSource;
pub use static_source::StaticCredentialSource;

use crate::error::AuthError;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialRecord {
    pub pin: String,
    pub token: String,
    pub user: String,
}

impl CredentialRecord {
    pub fn new(pin: impl Into<String>, token: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            pin: pin.into(),
            token: token.into(),
            user: user.into(),
        }
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("pin", &"[REDACTED]")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialTable {
    #[serde(default)]
    pub pins: Vec<CredentialRecord>,
}

impl CredentialTable {
    pub fn new(pins: Vec<CredentialRecord>) -> Self {
        Self { pins }
    }

    /// First record whose PIN equals `pin` exactly. No trimming.
    pub fn find(&self, pin: &str) -> Option<&CredentialRecord> {
        self.pins.iter().find(|record| record.pin == pin)
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}

#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Fetch the full credential table.
    ///
    /// # Errors
    /// [`AuthError::Transport`] when the table cannot be retrieved,
    /// [`AuthError::Format`] when it is not a valid table.
    async fn fetch_credentials(&self) -> Result<CredentialTable, AuthError>;

    /// Where the table comes from (for logs).
    fn describe(&self) -> String;
}
