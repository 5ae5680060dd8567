use super::RequestAuthorizer;
use crate::error::{RequestError, RequestFailure};

use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(30);

/// HTTP client for the console's data provider. Every call goes through the
/// [`RequestAuthorizer`].
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    client: Client,
    authorizer: RequestAuthorizer,
}

impl ApiClient {
    pub fn new(base_url: Url, authorizer: RequestAuthorizer) -> Result<Self, RequestError> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT_DURATION)
            .build()
            .map_err(|e| RequestError::generic(RequestFailure::Transport(e)))?;

        Ok(Self {
            base_url,
            client,
            authorizer,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET `path` (relative to the base URL) and decode the JSON body.
    ///
    /// # Errors
    ///
    /// [`RequestError::ForeignOrigin`] when `path` is an absolute URL on another
    /// origin. Nothing is sent and the bearer token never leaves for that host.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        let url = self.resolve(path)?;
        debug!("GET {}", url);

        let response = self.authorizer.send(self.client.get(url)).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| self.authorizer.fail(RequestFailure::Body(e)))
    }

    /// Join `path` onto the base URL, refusing anything on another origin.
    pub fn resolve(&self, path: &str) -> Result<Url, RequestError> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        if url.origin() != self.base_url.origin() {
            warn!("Refusing to send credentials to {}", url);
            return Err(RequestError::foreign_origin(&url, &self.base_url));
        }
        Ok(url)
    }
}
