//! PIN verification against a credential source.
//!
//! Read-only: verifying a PIN never touches the session store. The caller
//! decides what to do with the match.

use crate::connectivity::Connectivity;
use crate::credentials::CredentialSource;
use crate::error::AuthError;

use common::RedactedToken;

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

/// Token and user of the record matching a PIN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialMatch {
    pub token: RedactedToken,
    pub user: String,
}

#[derive(Clone)]
pub struct AuthenticationService {
    source: Arc<dyn CredentialSource>,
    connectivity: Arc<dyn Connectivity>,
    latency: Option<Duration>,
}

impl AuthenticationService {
    pub fn new(source: Arc<dyn CredentialSource>, connectivity: Arc<dyn Connectivity>) -> Self {
        Self {
            source,
            connectivity,
            latency: None,
        }
    }

    /// Delay every fetched table by `latency` before matching. `None` disables it.
    pub fn with_simulated_latency(mut self, latency: Option<Duration>) -> Self {
        self.latency = latency;
        self
    }

    pub fn simulated_latency(&self) -> Option<Duration> {
        self.latency
    }

    /// Look up `pin` in the credential table.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Offline`] if the device is offline; the source is not consulted
    /// - [`AuthError::InvalidCredential`] if no record has exactly this PIN
    /// - [`AuthError::Transport`] / [`AuthError::Format`] if the table cannot be fetched
    pub async fn verify_pin(&self, pin: &str) -> Result<CredentialMatch, AuthError> {
        if !self.connectivity.is_online() {
            warn!("PIN verification refused: device offline");
            return Err(AuthError::offline());
        }

        debug!("Verifying PIN against {}", self.source.describe());

        let table = self.source.fetch_credentials().await?;
        let table = with_latency(self.latency, table).await;

        match table.find(pin) {
            Some(record) => {
                info!("PIN verified for '{}'", record.user);
                Ok(CredentialMatch {
                    token: RedactedToken::new(record.token.clone()),
                    user: record.user.clone(),
                })
            }
            None => {
                info!("PIN verification failed: no matching record");
                Err(AuthError::invalid_credential())
            }
        }
    }
}

/// Hand `value` back after `latency`. Never changes the value.
pub async fn with_latency<T>(latency: Option<Duration>, value: T) -> T {
    if let Some(delay) = latency {
        tokio::time::sleep(delay).await;
    }
    value
}
