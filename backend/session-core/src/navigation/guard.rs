//! Gate evaluated before entering a protected screen.
//!
//! Redirecting to login is routine gating, not an error: the guard never
//! raises the error signal.

use super::Route;
use crate::session::SessionStore;

use log::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

#[derive(Clone)]
pub struct AuthorizationGuard {
    session: SessionStore,
}

impl AuthorizationGuard {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    /// Decide whether `route` may be entered.
    ///
    /// The token is read from storage on every call; nothing is cached, so a
    /// commit that lands between two calls is seen by the second.
    pub async fn can_enter(&self, route: &Route) -> GuardDecision {
        if !route.is_protected() {
            return GuardDecision::Allow;
        }

        match self.session.token().await {
            Ok(Some(_)) => GuardDecision::Allow,
            Ok(None) => {
                debug!("No session token, redirecting {} to login", route);
                GuardDecision::Redirect(Route::Login)
            }
            Err(e) => {
                warn!("Session token unreadable, redirecting {} to login: {}", route, e);
                GuardDecision::Redirect(Route::Login)
            }
        }
    }
}
