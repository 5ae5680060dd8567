//! Authorization for every outbound request the console issues, except the
//! PIN lookup.
//!
//! - Attaches `Authorization: Bearer <token>` when a session exists
//! - Sends unauthenticated when it does not; the server decides
//! - Classifies failures as offline or generic, raises the matching message
//!   on the error signal, and still returns the failure to the caller
//! - Never retries

mod api_client;

pub use api_client::ApiClient;

use crate::connectivity::Connectivity;
use crate::error::{RequestError, RequestFailure};
use crate::error_signal::ErrorSignal;
use crate::session::SessionStore;

use common::HttpStatusCode;

use std::sync::Arc;

use log::{debug, warn};
use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, Response};

#[derive(Clone)]
pub struct RequestAuthorizer {
    session: SessionStore,
    errors: ErrorSignal,
    connectivity: Arc<dyn Connectivity>,
}

impl RequestAuthorizer {
    pub fn new(
        session: SessionStore,
        errors: ErrorSignal,
        connectivity: Arc<dyn Connectivity>,
    ) -> Self {
        Self {
            session,
            errors,
            connectivity,
        }
    }

    /// Attach the current bearer token to `request`, if there is one.
    ///
    /// # Errors
    ///
    /// Returns the classified failure if the token cannot be read.
    pub async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, RequestError> {
        match self.session.token().await {
            Ok(Some(token)) => {
                debug!("Attaching bearer token ({} chars)", token.len());
                Ok(request.header(AUTHORIZATION, token.bearer_header_value()))
            }
            Ok(None) => {
                debug!("No session token, sending request unauthenticated");
                Ok(request)
            }
            Err(e) => Err(self.fail(RequestFailure::TokenRead(e))),
        }
    }

    /// Authorize and send `request`.
    ///
    /// Non-2xx responses count as failures.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, RequestError> {
        let request = self.authorize(request).await?;

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return Err(self.fail(RequestFailure::Transport(e))),
        };

        let status_code = HttpStatusCode(response.status().as_u16());
        if !status_code.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.fail(RequestFailure::Status { status_code, body }));
        }

        Ok(response)
    }

    /// Classify `failure`, raise it on the error signal, and return it.
    ///
    /// Also used by callers that fail after the response arrived (e.g. an
    /// unreadable body) so those surface the same way.
    #[track_caller]
    pub fn fail(&self, failure: RequestFailure) -> RequestError {
        let kind = failure.kind();
        let error = if self.connectivity.is_online() {
            RequestError::generic(failure)
        } else {
            RequestError::offline(failure)
        };

        warn!("Request failed ({kind}): {error}");
        self.errors.show(error.user_message());
        error
    }
}
