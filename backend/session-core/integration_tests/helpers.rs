//! Shared fixtures for integration tests.

use session_core::connectivity::NetworkStatus;
use session_core::error_signal::ErrorSignal;
use session_core::request::RequestAuthorizer;
use session_core::session::SessionStore;
use session_core::storage::MemoryKeyValueStore;

use std::sync::Arc;

pub const CREDENTIALS_BODY: &str = r#"{
  "pins": [
    { "pin": "4821", "token": "tok-77", "user": "John Watson" },
    { "pin": "1234", "token": "tok-12", "user": "Mary Morstan" }
  ]
}"#;

/// Authorizer over an in-memory session, with handles to everything it touches.
pub struct AuthorizerHarness {
    pub authorizer: RequestAuthorizer,
    pub session: SessionStore,
    pub errors: ErrorSignal,
    pub network: NetworkStatus,
}

impl AuthorizerHarness {
    pub fn new() -> Self {
        let session = SessionStore::new(Arc::new(MemoryKeyValueStore::new()));
        let errors = ErrorSignal::new();
        let network = NetworkStatus::online();
        let authorizer =
            RequestAuthorizer::new(session.clone(), errors.clone(), Arc::new(network.clone()));

        Self {
            authorizer,
            session,
            errors,
            network,
        }
    }
}
