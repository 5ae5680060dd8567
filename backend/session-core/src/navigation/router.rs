use super::{AuthorizationGuard, GuardDecision, Route};

use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use tokio::sync::watch;

/// Something that can move the app to another screen.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Navigate to `route` and return the screen actually shown.
    async fn navigate(&self, route: Route) -> Route;
}

/// Router that runs the guard before every protected screen and publishes
/// the current route.
#[derive(Clone)]
pub struct Router {
    guard: AuthorizationGuard,
    current: Arc<watch::Sender<Route>>,
}

impl Router {
    /// Starts on the login screen.
    pub fn new(guard: AuthorizationGuard) -> Self {
        Self {
            guard,
            current: Arc::new(watch::Sender::new(Route::Login)),
        }
    }

    pub async fn navigate_path(&self, path: &str) -> Route {
        self.navigate(Route::parse(path)).await
    }

    pub fn current(&self) -> Route {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }
}

#[async_trait]
impl Navigator for Router {
    async fn navigate(&self, route: Route) -> Route {
        let target = match self.guard.can_enter(&route).await {
            GuardDecision::Allow => route,
            GuardDecision::Redirect(redirect) => redirect,
        };

        info!("Navigated to {}", target);
        self.current.send_replace(target.clone());
        target
    }
}
