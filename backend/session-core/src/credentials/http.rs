use super::{CredentialSource, CredentialTable};
use crate::error::AuthError;

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use url::Url;

const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(30);

/// Fetches the credential table over HTTP.
///
/// The request is sent without a bearer credential.
#[derive(Clone)]
pub struct HttpCredentialSource {
    url: Url,
    client: Client,
}

impl HttpCredentialSource {
    pub fn new(url: Url) -> Result<Self, AuthError> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT_DURATION).build()?;
        Ok(Self { url, client })
    }

    pub fn from_url_str(url: &str) -> Result<Self, AuthError> {
        Self::new(Url::parse(url)?)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl CredentialSource for HttpCredentialSource {
    async fn fetch_credentials(&self) -> Result<CredentialTable, AuthError> {
        debug!("Fetching credential table from {}", self.url);

        let response = self.client.get(self.url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(AuthError::from_http_response(
                response.status().as_u16(),
                response.text().await.unwrap_or_default(),
            ));
        }

        let body = response.text().await?;
        let table: CredentialTable = serde_json::from_str(&body)?;

        debug!("Credential table holds {} records", table.len());
        Ok(table)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}
