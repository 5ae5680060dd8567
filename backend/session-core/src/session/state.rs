//! Session store using the actor pattern.
//!
//! # Architecture
//!
//! - Commit and clear are sent as commands over an mpsc channel
//! - A dedicated task applies them one at a time and acknowledges each over a
//!   oneshot channel, so callers resume only once the write is durable
//! - Reads go straight to the key-value store through `get_many`, which sees
//!   either the whole previous session or the whole new one
//!
//! The in-memory current user is a `watch` channel: the display layer
//! subscribes to it, while the guard and the request authorizer always
//! re-read the token from storage.

use super::{SESSION_TOKEN_KEY, SESSION_USER_KEY, Session, user_initials};
use crate::error::StoreError;
use crate::storage::KeyValueStore;

use common::{ErrorLocation, RedactedToken};

use std::panic::Location;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::{Mutex, mpsc, oneshot, watch};

type Reply = oneshot::Sender<Result<(), StoreError>>;

/// Commands that mutate the persisted session.
#[derive(Debug)]
enum SessionCommand {
    /// Persist token and user together, replacing any existing session.
    Commit { session: Session, reply: Reply },

    /// Remove token and user together.
    Clear { reply: Reply },
}

/// Shared handle to the persisted session.
///
/// `Clone` is cheap and every clone talks to the same actor and storage.
#[derive(Clone)]
pub struct SessionStore {
    /// Channel to send mutation commands to the actor
    command_tx: Arc<Mutex<Option<mpsc::Sender<SessionCommand>>>>,

    /// Track if actor has been initialized
    actor_init: Arc<Mutex<bool>>,

    store: Arc<dyn KeyValueStore>,

    /// Display name of the signed-in user, empty when logged out
    current_user: Arc<watch::Sender<String>>,
}

impl SessionStore {
    /// The actor is spawned lazily on the first commit or clear.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            command_tx: Arc::new(Mutex::new(None)),
            actor_init: Arc::new(Mutex::new(false)),
            store,
            current_user: Arc::new(watch::Sender::new(String::new())),
        }
    }

    /// Read the persisted session.
    ///
    /// # Returns
    ///
    /// `Some(Session)` when a non-empty token is stored, `None` otherwise.
    pub async fn get(&self) -> Result<Option<Session>, StoreError> {
        let mut values = self
            .store
            .get_many(&[SESSION_TOKEN_KEY, SESSION_USER_KEY])
            .await?
            .into_iter();

        let token = values.next().flatten();
        let user = values.next().flatten();

        match token {
            Some(token) if !token.is_empty() => {
                let user = user.unwrap_or_else(|| {
                    warn!("Session token present without a user name");
                    String::new()
                });
                Ok(Some(Session::new(token, user)))
            }
            _ => Ok(None),
        }
    }

    /// Read only the persisted token, `None` when absent or empty.
    pub async fn token(&self) -> Result<Option<RedactedToken>, StoreError> {
        let token = self.store.get(SESSION_TOKEN_KEY).await?;
        Ok(token.filter(|t| !t.is_empty()).map(RedactedToken::new))
    }

    /// Persist a session, replacing any existing one.
    ///
    /// Returns after the write has been applied. On success the current user
    /// is updated for observers.
    pub async fn commit(
        &self,
        token: RedactedToken,
        user_display_name: impl Into<String>,
    ) -> Result<(), StoreError> {
        let session = Session {
            token,
            user_display_name: user_display_name.into(),
        };

        self.request(|reply| SessionCommand::Commit { session, reply })
            .await
    }

    /// Remove the persisted session and reset the current user.
    ///
    /// Clearing an absent session is a no-op that succeeds.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.request(|reply| SessionCommand::Clear { reply }).await
    }

    /// Warm the current user from the persisted user name.
    ///
    /// Runs once at process start. The token is not consulted.
    pub async fn init_session_user(&self) -> Result<(), StoreError> {
        let user = self.store.get(SESSION_USER_KEY).await?.unwrap_or_default();

        if user.is_empty() {
            debug!("No persisted session user");
        } else {
            info!("Restored session user '{}'", user);
        }

        self.current_user.send_replace(user);
        Ok(())
    }

    /// Display name of the signed-in user, empty when logged out.
    pub fn current_user(&self) -> String {
        self.current_user.borrow().clone()
    }

    pub fn user_initials(&self) -> String {
        user_initials(&self.current_user.borrow())
    }

    /// Observe changes to the current user.
    pub fn subscribe_current_user(&self) -> watch::Receiver<String> {
        self.current_user.subscribe()
    }

    async fn request<F>(&self, build: F) -> Result<(), StoreError>
    where
        F: FnOnce(Reply) -> SessionCommand,
    {
        self.ensure_actor().await;

        let (reply_tx, reply_rx) = oneshot::channel();

        {
            let tx_guard = self.command_tx.lock().await;
            let tx = tx_guard.as_ref().ok_or_else(|| StoreError::ActorStopped {
                message: "Session actor not initialized".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

            tx.send(build(reply_tx))
                .await
                .map_err(|e| StoreError::ActorStopped {
                    message: format!("Session actor died: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        }

        reply_rx.await.map_err(|_| StoreError::ActorStopped {
            message: "Session actor dropped the reply".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?
    }

    /// Ensure actor is spawned (called lazily from async context).
    async fn ensure_actor(&self) {
        let mut init_guard = self.actor_init.lock().await;
        if !*init_guard {
            let (tx, rx) = mpsc::channel(16);

            // Store tx BEFORE spawning to avoid race
            let mut tx_guard = self.command_tx.lock().await;
            *tx_guard = Some(tx);
            drop(tx_guard);

            tokio::spawn(session_actor(
                rx,
                Arc::clone(&self.store),
                Arc::clone(&self.current_user),
            ));
            *init_guard = true;
            info!("Session actor spawned");
        }
    }
}

/// The session actor task.
///
/// Sole writer of the session keys. Runs until every `SessionStore` clone has
/// been dropped.
async fn session_actor(
    mut command_rx: mpsc::Receiver<SessionCommand>,
    store: Arc<dyn KeyValueStore>,
    current_user: Arc<watch::Sender<String>>,
) {
    debug!("Session actor started");

    while let Some(cmd) = command_rx.recv().await {
        match cmd {
            SessionCommand::Commit { session, reply } => {
                if session.token.is_empty() {
                    warn!("Committing a session with an empty token");
                }

                let result = store
                    .set_many(&[
                        (SESSION_TOKEN_KEY, session.token.as_str()),
                        (SESSION_USER_KEY, session.user_display_name.as_str()),
                    ])
                    .await;

                match &result {
                    Ok(()) => {
                        info!(
                            "Session committed for '{}' (token {} chars)",
                            session.user_display_name,
                            session.token.len()
                        );
                        current_user.send_replace(session.user_display_name.clone());
                    }
                    Err(e) => error!("Session commit failed: {}", e),
                }

                let _ = reply.send(result);
            }
            SessionCommand::Clear { reply } => {
                let result = store
                    .remove_many(&[SESSION_TOKEN_KEY, SESSION_USER_KEY])
                    .await;

                match &result {
                    Ok(()) => {
                        info!("Session cleared");
                        current_user.send_replace(String::new());
                    }
                    Err(e) => error!("Session clear failed: {}", e),
                }

                let _ = reply.send(result);
            }
        }
    }

    debug!("Session actor stopped");
}
