//! Persisted session: the bearer token and the user display name.
//!
//! A session exists only after the login flow commits it. Both values live in
//! the durable key-value store under [`SESSION_TOKEN_KEY`] and
//! [`SESSION_USER_KEY`] and are always written and removed together.

pub mod identity;
mod state;

pub use identity::{FALLBACK_INITIALS, user_initials};
pub use state::SessionStore;

use common::RedactedToken;

pub const SESSION_TOKEN_KEY: &str = "session_token";
pub const SESSION_USER_KEY: &str = "session_user";

/// A committed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: RedactedToken,
    pub user_display_name: String,
}

impl Session {
    pub fn new(token: impl Into<RedactedToken>, user_display_name: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_display_name: user_display_name.into(),
        }
    }

    pub fn initials(&self) -> String {
        user_initials(&self.user_display_name)
    }
}
