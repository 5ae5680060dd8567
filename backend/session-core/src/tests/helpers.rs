//! Shared fixtures for unit tests.

use crate::auth::AuthenticationService;
use crate::connectivity::NetworkStatus;
use crate::credentials::{CredentialRecord, CredentialSource, CredentialTable};
use crate::error::{AuthError, StoreError};
use crate::error_signal::ErrorSignal;
use crate::login::LoginFlowController;
use crate::navigation::{Navigator, Route};
use crate::session::SessionStore;
use crate::storage::{KeyValueStore, MemoryKeyValueStore};

use common::ErrorLocation;

use std::panic::Location;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

pub const KNOWN_PIN: &str = "4821";
pub const KNOWN_TOKEN: &str = "tok-77";
pub const KNOWN_USER: &str = "John Watson";

pub fn sample_table() -> CredentialTable {
    CredentialTable::new(vec![
        CredentialRecord::new(KNOWN_PIN, KNOWN_TOKEN, KNOWN_USER),
        CredentialRecord::new("1234", "tok-12", "Mary Morstan"),
    ])
}

/// Serves a fixed table (or a fixed failure) and counts fetches.
pub struct CountingSource {
    table: Option<CredentialTable>,
    delay: Option<Duration>,
    fetches: AtomicUsize,
}

impl CountingSource {
    pub fn serving(table: CredentialTable) -> Self {
        Self {
            table: Some(table),
            delay: None,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Every fetch fails with a transport error.
    pub fn unreachable() -> Self {
        Self {
            table: None,
            delay: None,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialSource for CountingSource {
    async fn fetch_credentials(&self) -> Result<CredentialTable, AuthError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.table {
            Some(table) => Ok(table.clone()),
            None => Err(AuthError::Transport {
                message: "connection refused".to_string(),
                status_code: None,
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    fn describe(&self) -> String {
        "counting test source".to_string()
    }
}

/// Reads succeed, every write fails.
#[derive(Default)]
pub struct ReadOnlyStore {
    inner: MemoryKeyValueStore,
}

impl ReadOnlyStore {
    fn refuse() -> StoreError {
        StoreError::Write {
            path: "read-only".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

#[async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key).await
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(Self::refuse())
    }

    async fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(Self::refuse())
    }

    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StoreError> {
        self.inner.get_many(keys).await
    }

    async fn set_many(&self, _entries: &[(&str, &str)]) -> Result<(), StoreError> {
        Err(Self::refuse())
    }

    async fn remove_many(&self, _keys: &[&str]) -> Result<(), StoreError> {
        Err(Self::refuse())
    }
}

/// Every read fails.
#[derive(Default)]
pub struct UnreadableStore;

impl UnreadableStore {
    fn corrupt() -> StoreError {
        StoreError::Parse {
            path: "corrupt.json".into(),
            reason: "expected value".to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

#[async_trait]
impl KeyValueStore for UnreadableStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(Self::corrupt())
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Ok(())
    }

    async fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }

    async fn get_many(&self, _keys: &[&str]) -> Result<Vec<Option<String>>, StoreError> {
        Err(Self::corrupt())
    }

    async fn set_many(&self, _entries: &[(&str, &str)]) -> Result<(), StoreError> {
        Ok(())
    }

    async fn remove_many(&self, _keys: &[&str]) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Records every navigation request and lands exactly where asked.
#[derive(Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<Route> {
        self.visited.lock().unwrap().clone()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn navigate(&self, route: Route) -> Route {
        self.visited.lock().unwrap().push(route.clone());
        route
    }
}

pub fn memory_session() -> SessionStore {
    SessionStore::new(Arc::new(MemoryKeyValueStore::new()))
}

/// Everything a login-flow test needs to observe.
pub struct LoginHarness {
    pub controller: LoginFlowController,
    pub session: SessionStore,
    pub errors: ErrorSignal,
    pub network: NetworkStatus,
    pub navigator: Arc<RecordingNavigator>,
    pub source: Arc<CountingSource>,
}

impl LoginHarness {
    pub fn new() -> Self {
        Self::with(
            CountingSource::serving(sample_table()),
            Arc::new(MemoryKeyValueStore::new()),
        )
    }

    pub fn with(source: CountingSource, store: Arc<dyn KeyValueStore>) -> Self {
        let source = Arc::new(source);
        let network = NetworkStatus::online();
        let session = SessionStore::new(store);
        let errors = ErrorSignal::new();
        let navigator = Arc::new(RecordingNavigator::default());

        let auth = AuthenticationService::new(source.clone(), Arc::new(network.clone()));
        let controller =
            LoginFlowController::new(auth, session.clone(), errors.clone(), navigator.clone());

        Self {
            controller,
            session,
            errors,
            network,
            navigator,
            source,
        }
    }
}
