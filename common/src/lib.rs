//! Shared primitives for the HotSOS console.
//!
//! This crate holds the small value types every other crate leans on. It has
//! no business logic and no async runtime.
//!
//! ## Architecture
//!
//! - **common** (this crate): error locations, HTTP status codes, redacted tokens
//! - **session-core**: session, login flow, guard and request authorization
//! - **hotsos-console**: application wiring and the interactive console

pub mod error;
pub mod http_status;
pub mod redacted_token;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_token::RedactedToken;

#[cfg(test)]
mod tests;
