//! PIN and password steps.
//!
//! Failures the user should see are already on the error signal when these
//! return, so they come back as `Ok(None)`. Only failures the signal ignores
//! (busy, wrong step) are turned into a reply here.

use session_core::error::LoginError;
use session_core::login::{LoginFlowController, LoginProgress};

use log::debug;

pub async fn submit_pin(flow: &LoginFlowController, pin: &str) -> Option<String> {
    match flow.submit_pin(pin).await {
        Ok(progress) => Some(describe(&progress)),
        Err(e) => silent_failure(&e),
    }
}

pub async fn submit_password(flow: &LoginFlowController, password: &str) -> Option<String> {
    match flow.submit_password(password).await {
        Ok(progress) => Some(describe(&progress)),
        Err(e) => silent_failure(&e),
    }
}

pub fn go_back(flow: &LoginFlowController) -> String {
    if flow.go_back() {
        "Back to PIN entry.".to_string()
    } else {
        "Still working, try again in a moment.".to_string()
    }
}

pub fn reset(flow: &LoginFlowController) -> String {
    if flow.reset() {
        "Login form cleared.".to_string()
    } else {
        "Still working, try again in a moment.".to_string()
    }
}

fn describe(progress: &LoginProgress) -> String {
    match progress {
        LoginProgress::AwaitingPassword { verified_user } => {
            format!("Welcome {verified_user}. Enter your password.")
        }
        LoginProgress::Committed { user, landed } => {
            format!("Signed in as {user}. Now at {landed}.")
        }
    }
}

fn silent_failure(error: &LoginError) -> Option<String> {
    debug!("Login step failed ({}): {}", error.error_category(), error);
    match error {
        LoginError::Busy { .. } => Some("Still working, try again in a moment.".to_string()),
        LoginError::WrongStep { expected, actual, .. } => {
            Some(format!("Not available now: {actual}, expected {expected}."))
        }
        _ => None,
    }
}
