//! Application context: one shared instance of each core service per app
//! session, built once at startup and handed to whoever needs it.

use crate::auth::AuthenticationService;
use crate::config::{AppEnvironment, ConsolePaths};
use crate::connectivity::{Connectivity, NetworkStatus};
use crate::credentials::{CredentialSource, HttpCredentialSource, StaticCredentialSource};
use crate::error::{CoreError, RequestError, StoreError};
use crate::error_signal::ErrorSignal;
use crate::login::LoginFlowController;
use crate::navigation::{AuthorizationGuard, Navigator, Route, Router};
use crate::request::{ApiClient, RequestAuthorizer};
use crate::session::SessionStore;
use crate::storage::{FileKeyValueStore, KeyValueStore};

use std::sync::Arc;

use log::{info, warn};

#[derive(Clone)]
pub struct AppContext {
    pub environment: AppEnvironment,
    pub session: SessionStore,
    pub errors: ErrorSignal,
    pub network: NetworkStatus,
    pub router: Router,
    pub guard: AuthorizationGuard,
    pub auth: AuthenticationService,
    pub authorizer: RequestAuthorizer,
    pub api: ApiClient,
}

impl AppContext {
    /// Build the context for `environment` with durable storage under `paths`.
    ///
    /// The credential source follows `mock_auth`: the bundled table under the
    /// assets directory, or `{api_base_url}/api/auth/pin`.
    pub async fn build(environment: AppEnvironment, paths: &ConsolePaths) -> Result<Self, CoreError> {
        let store = FileKeyValueStore::open(paths.preferences_file()).await?;

        let source: Arc<dyn CredentialSource> = if environment.mock_auth {
            Arc::new(StaticCredentialSource::from_file(paths.mock_credentials_file()))
        } else {
            Arc::new(HttpCredentialSource::new(environment.credentials_url()?)?)
        };

        Self::with_parts(environment, Arc::new(store), source, NetworkStatus::online())
    }

    /// Assemble a context from explicit parts.
    pub fn with_parts(
        environment: AppEnvironment,
        store: Arc<dyn KeyValueStore>,
        credentials: Arc<dyn CredentialSource>,
        network: NetworkStatus,
    ) -> Result<Self, CoreError> {
        let connectivity: Arc<dyn Connectivity> = Arc::new(network.clone());

        let session = SessionStore::new(store);
        let errors = ErrorSignal::new();
        let guard = AuthorizationGuard::new(session.clone());
        let router = Router::new(guard.clone());

        let auth = AuthenticationService::new(credentials.clone(), Arc::clone(&connectivity))
            .with_simulated_latency(environment.simulated_latency());

        let authorizer = RequestAuthorizer::new(session.clone(), errors.clone(), connectivity);
        let api = ApiClient::new(environment.api_base()?, authorizer.clone())?;

        info!(
            "{} ({}) ready, credentials from {}",
            environment.app_name,
            environment.name,
            credentials.describe()
        );

        Ok(Self {
            environment,
            session,
            errors,
            network,
            router,
            guard,
            auth,
            authorizer,
            api,
        })
    }

    /// Process-start initialization: restore the display user from storage.
    pub async fn initialize(&self) -> Result<(), StoreError> {
        self.session.init_session_user().await
    }

    /// A fresh login flow wired to this context.
    pub fn login_flow(&self) -> LoginFlowController {
        LoginFlowController::new(
            self.auth.clone(),
            self.session.clone(),
            self.errors.clone(),
            Arc::new(self.router.clone()),
        )
    }

    /// Navigate by path through the guard.
    pub async fn open(&self, path: &str) -> Route {
        self.router.navigate_path(path).await
    }

    /// Clear the session and return to the login screen.
    pub async fn logout(&self) -> Result<Route, StoreError> {
        let user = self.session.current_user();
        self.session.clear().await?;

        if user.is_empty() {
            warn!("Logout requested with no current user");
        } else {
            info!("Logged out '{}'", user);
        }

        Ok(self.router.navigate(Route::Login).await)
    }

    /// GET `path` from the data provider through the request authorizer.
    pub async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, RequestError> {
        self.api.get_json(path).await
    }
}
