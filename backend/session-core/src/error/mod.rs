pub mod auth;
pub mod config;
pub mod login;
pub mod request;
pub mod store;

pub use auth::AuthError;
pub use config::ConfigError;
pub use login::{LoginError, PasswordValidationFailure, PinValidationFailure, ValidationFailure};
pub use request::{RequestError, RequestFailure};
pub use store::StoreError;

use thiserror::Error;

/// Shown when the device reports no connectivity.
pub const OFFLINE_MESSAGE: &str = "Offline: Please check your connection.";

/// Shown when no credential record matches the submitted PIN.
pub const INVALID_PIN_MESSAGE: &str = "Invalid PIN. Please try again.";

/// Shown for any failed authorized request while online.
pub const GENERIC_REQUEST_MESSAGE: &str = "Something went wrong. Please try again.";

/// Shown when a login step fails for a reason with no dedicated message.
pub const FALLBACK_LOGIN_MESSAGE: &str = "An error occurred. Please try again.";

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Login(#[from] LoginError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
