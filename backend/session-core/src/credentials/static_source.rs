use super::{CredentialSource, CredentialTable};
use crate::error::AuthError;

use common::ErrorLocation;

use std::panic::Location;
use std::path::PathBuf;

use async_trait::async_trait;
use log::debug;

/// Credential table bundled with the app, or held in memory.
///
/// The file variant is re-read on every fetch, like a request for a static
/// asset would be.
#[derive(Debug, Clone)]
pub enum StaticCredentialSource {
    File(PathBuf),
    Table(CredentialTable),
}

impl StaticCredentialSource {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        StaticCredentialSource::File(path.into())
    }

    pub fn from_table(table: CredentialTable) -> Self {
        StaticCredentialSource::Table(table)
    }
}

#[async_trait]
impl CredentialSource for StaticCredentialSource {
    async fn fetch_credentials(&self) -> Result<CredentialTable, AuthError> {
        match self {
            StaticCredentialSource::Table(table) => Ok(table.clone()),
            StaticCredentialSource::File(path) => {
                debug!("Reading credential table from {}", path.display());

                let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
                    AuthError::Transport {
                        message: format!("{}: {}", path.display(), e),
                        status_code: None,
                        location: ErrorLocation::from(Location::caller()),
                    }
                })?;

                Ok(serde_json::from_str(&contents)?)
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            StaticCredentialSource::File(path) => path.display().to_string(),
            StaticCredentialSource::Table(table) => format!("in-memory table ({} records)", table.len()),
        }
    }
}
