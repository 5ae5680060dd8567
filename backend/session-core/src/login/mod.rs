//! Two-step login: PIN, then password, then commit.
//!
//! A successful PIN check only produces a [`PendingLogin`] held inside
//! [`LoginStep::AwaitingPassword`]. Nothing is persisted until the password
//! step commits it to the [`SessionStore`]. Dropping the controller, going back,
//! or resetting discards the pending login with nothing to roll back.
//!
//! Every user-visible failure is raised on the [`ErrorSignal`] here and also
//! returned, so the caller can reset its own loading state.

pub mod validation;

use crate::auth::AuthenticationService;
use crate::error::{LoginError, ValidationFailure};
use crate::error_signal::ErrorSignal;
use crate::navigation::{Navigator, Route};
use crate::session::{SessionStore, user_initials};

use validation::{validate_password, validate_pin};

use common::RedactedToken;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStepKind {
    AwaitingPin,
    AwaitingPassword,
}

impl fmt::Display for LoginStepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginStepKind::AwaitingPin => write!(f, "awaiting PIN"),
            LoginStepKind::AwaitingPassword => write!(f, "awaiting password"),
        }
    }
}

/// Result of a successful PIN check, not yet persisted.
#[derive(Debug, Clone)]
pub struct PendingLogin {
    verified_user: String,
    pending_token: RedactedToken,
}

impl PendingLogin {
    pub fn verified_user(&self) -> &str {
        &self.verified_user
    }
}

#[derive(Debug)]
pub enum LoginStep {
    AwaitingPin,
    AwaitingPassword(PendingLogin),
}

impl LoginStep {
    pub fn kind(&self) -> LoginStepKind {
        match self {
            LoginStep::AwaitingPin => LoginStepKind::AwaitingPin,
            LoginStep::AwaitingPassword(_) => LoginStepKind::AwaitingPassword,
        }
    }
}

/// What a successful submission moved the flow to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginProgress {
    AwaitingPassword { verified_user: String },
    Committed { user: String, landed: Route },
}

struct FormState {
    step: LoginStep,
    pin_input: String,
    password_input: String,
}

impl FormState {
    fn new() -> Self {
        Self {
            step: LoginStep::AwaitingPin,
            pin_input: String::new(),
            password_input: String::new(),
        }
    }
}

/// Releases the busy mark when the operation ends or its future is dropped.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct LoginFlowController {
    auth: AuthenticationService,
    session: SessionStore,
    errors: ErrorSignal,
    navigator: Arc<dyn Navigator>,
    form: Mutex<FormState>,
    busy: AtomicBool,
}

impl LoginFlowController {
    pub fn new(
        auth: AuthenticationService,
        session: SessionStore,
        errors: ErrorSignal,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            auth,
            session,
            errors,
            navigator,
            form: Mutex::new(FormState::new()),
            busy: AtomicBool::new(false),
        }
    }

    /// Step 1: validate and verify a PIN.
    ///
    /// # Errors
    ///
    /// - [`LoginError::Busy`] while another submission is in flight (nothing else happens)
    /// - [`LoginError::WrongStep`] if the flow is already awaiting a password
    /// - [`LoginError::Validation`] for a missing, non-numeric or short PIN; the
    ///   credential source is not consulted and the state is unchanged
    /// - [`LoginError::Auth`] when verification fails; the PIN input is cleared
    pub async fn submit_pin(&self, pin: &str) -> Result<LoginProgress, LoginError> {
        let _busy = self.begin()?;

        {
            let mut form = self.form();
            let current = form.step.kind();
            if current != LoginStepKind::AwaitingPin {
                return Err(LoginError::wrong_step(LoginStepKind::AwaitingPin, current));
            }

            form.pin_input = pin.to_string();

            if let Err(reason) = validate_pin(pin) {
                debug!("PIN rejected by validation: {:?}", reason);
                return Err(self.raise(LoginError::validation(ValidationFailure::Pin(reason))));
            }
        }

        match self.auth.verify_pin(pin).await {
            Ok(credential) => {
                let verified_user = credential.user.clone();
                self.form().step = LoginStep::AwaitingPassword(PendingLogin {
                    verified_user: credential.user,
                    pending_token: credential.token,
                });

                info!("PIN accepted for '{}', awaiting password", verified_user);
                Ok(LoginProgress::AwaitingPassword { verified_user })
            }
            Err(e) => {
                self.form().pin_input.clear();
                Err(self.raise(LoginError::from(e)))
            }
        }
    }

    /// Step 2: validate the password and commit the pending login.
    ///
    /// On success the session is persisted, the pending login is consumed and
    /// the navigator is sent to the landing screen.
    ///
    /// # Errors
    ///
    /// - [`LoginError::Busy`] while another submission is in flight
    /// - [`LoginError::WrongStep`] if no PIN has been verified
    /// - [`LoginError::Validation`] for an empty or short password; stays on this step
    /// - [`LoginError::Commit`] if the session cannot be persisted; the pending
    ///   login is kept so the user can retry
    pub async fn submit_password(&self, password: &str) -> Result<LoginProgress, LoginError> {
        let _busy = self.begin()?;

        let pending = {
            let mut form = self.form();
            let pending = match &form.step {
                LoginStep::AwaitingPassword(pending) => pending.clone(),
                LoginStep::AwaitingPin => {
                    return Err(LoginError::wrong_step(
                        LoginStepKind::AwaitingPassword,
                        LoginStepKind::AwaitingPin,
                    ));
                }
            };

            form.password_input = password.to_string();

            if let Err(reason) = validate_password(password) {
                debug!("Password rejected by validation: {:?}", reason);
                return Err(self.raise(LoginError::validation(ValidationFailure::Password(
                    reason,
                ))));
            }

            pending
        };

        if let Err(e) = self
            .session
            .commit(pending.pending_token, pending.verified_user.clone())
            .await
        {
            warn!("Login commit failed for '{}': {}", pending.verified_user, e);
            return Err(self.raise(LoginError::commit(e)));
        }

        *self.form() = FormState::new();

        let landed = self.navigator.navigate(Route::landing()).await;
        info!("Login committed for '{}'", pending.verified_user);

        Ok(LoginProgress::Committed {
            user: pending.verified_user,
            landed,
        })
    }

    /// Return to the PIN step, discarding the pending login and the password input.
    ///
    /// Ignored (returns `false`) while a submission is in flight.
    pub fn go_back(&self) -> bool {
        if self.is_busy() {
            debug!("Back navigation ignored while busy");
            return false;
        }

        let mut form = self.form();
        form.step = LoginStep::AwaitingPin;
        form.password_input.clear();
        true
    }

    /// Back to a blank PIN step, clearing both inputs.
    pub fn reset(&self) -> bool {
        if self.is_busy() {
            return false;
        }

        *self.form() = FormState::new();
        true
    }

    pub fn step_kind(&self) -> LoginStepKind {
        self.form().step.kind()
    }

    /// User name from the verified PIN, while awaiting the password.
    pub fn verified_user(&self) -> Option<String> {
        match &self.form().step {
            LoginStep::AwaitingPassword(pending) => Some(pending.verified_user.clone()),
            LoginStep::AwaitingPin => None,
        }
    }

    pub fn initials(&self) -> Option<String> {
        self.verified_user().map(|user| user_initials(&user))
    }

    pub fn pin_input(&self) -> String {
        self.form().pin_input.clone()
    }

    pub fn password_input(&self) -> String {
        self.form().password_input.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Result<BusyGuard<'_>, LoginError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Login submission ignored while busy");
            return Err(LoginError::busy());
        }
        Ok(BusyGuard(&self.busy))
    }

    fn form(&self) -> MutexGuard<'_, FormState> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Surface `error` on the error signal and hand it back.
    fn raise(&self, error: LoginError) -> LoginError {
        if let Some(message) = error.user_message() {
            self.errors.show(message);
        }
        error
    }
}
