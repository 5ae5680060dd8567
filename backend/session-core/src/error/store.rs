use std::path::PathBuf;

use common::ErrorLocation;
use thiserror::Error as ThisError;

/// Failures of the durable key-value store and the session actor on top of it.
#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("Store Read Error: {path}: {source} {location}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Store Write Error: {path}: {source} {location}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Store Parse Error: {path}: {reason} {location}")]
    Parse {
        path: PathBuf,
        reason: String,
        location: ErrorLocation,
    },

    #[error("Store Serialization Error: {reason} {location}")]
    Serialize {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Session Actor Error: {message} {location}")]
    ActorStopped {
        message: String,
        location: ErrorLocation,
    },
}
