use common::ErrorLocation;

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the console front end.
///
/// Core failures are flattened to their message so the value stays
/// serializable; location tracking is kept.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ConsoleError {
    /// Error from the console itself (startup, terminal I/O)
    #[error("Console Error: {message} {location}")]
    Console {
        message: String,
        location: ErrorLocation,
    },

    /// Error from session-core operations (config, storage, requests)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },

    /// Input line that is not a known command
    #[error("Usage Error: {message} {location}")]
    Usage {
        message: String,
        location: ErrorLocation,
    },
}
