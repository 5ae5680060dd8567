//! Platform-aware detection of the console's data, config, asset and log directories.
//!
//! Lookup order for the data directory:
//! 1. `HOTSOS_DATA_DIR` environment variable (explicit override)
//! 2. Platform-specific data directory via `dirs`
//!
//! Returns Result, never silently falls back to a wrong path.

use crate::config::MOCK_CREDENTIALS_RESOURCE;
use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::env;
use std::panic::Location;
use std::path::{Path, PathBuf};

use log::{debug, info};

const APP_DIR_NAME: &str = "hotsos-console";
const PREFERENCES_FILE_NAME: &str = "preferences.json";
const DATA_DIR_ENV_VAR: &str = "HOTSOS_DATA_DIR";
const ASSETS_DIR_ENV_VAR: &str = "HOTSOS_ASSETS_DIR";
const ASSETS_DIR_NAME: &str = "assets";

/// Resolved directories for one console installation.
#[derive(Debug, Clone)]
pub struct ConsolePaths {
    /// Durable preferences live here.
    pub data_dir: PathBuf,
    /// `environments.toml` is read from here.
    pub config_dir: PathBuf,
    /// Static resources such as the mock credential table.
    pub assets_dir: PathBuf,
    pub log_dir: PathBuf,
    /// How the data directory was determined.
    pub source: PathSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    /// Set via `HOTSOS_DATA_DIR`.
    EnvVar,
    /// Detected via platform-specific XDG/AppData/Library path.
    PlatformDefault,
    /// Supplied by the caller.
    Explicit,
}

impl std::fmt::Display for PathSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathSource::EnvVar => write!(f, "{DATA_DIR_ENV_VAR}"),
            PathSource::PlatformDefault => write!(f, "platform default"),
            PathSource::Explicit => write!(f, "explicit"),
        }
    }
}

impl ConsolePaths {
    /// Lay every directory out under one root (tests, portable installs).
    pub fn from_root(root: &Path) -> Self {
        Self {
            data_dir: root.join("data"),
            config_dir: root.join("config"),
            assets_dir: root.join(ASSETS_DIR_NAME),
            log_dir: root.join("logs"),
            source: PathSource::Explicit,
        }
    }

    pub fn preferences_file(&self) -> PathBuf {
        self.data_dir.join(PREFERENCES_FILE_NAME)
    }

    pub fn mock_credentials_file(&self) -> PathBuf {
        self.assets_dir.join(MOCK_CREDENTIALS_RESOURCE)
    }
}

/// Detect console paths for this machine.
///
/// # Errors
/// Returns [`ConfigError::DirectoryNotFound`] if the platform exposes no data directory
/// and no override is set.
pub fn detect_console_paths() -> Result<ConsolePaths, ConfigError> {
    let (data_dir, source) = match env::var(DATA_DIR_ENV_VAR) {
        Ok(custom_dir) => {
            info!("Using {DATA_DIR_ENV_VAR} override: {custom_dir}");
            (PathBuf::from(custom_dir), PathSource::EnvVar)
        }
        Err(_) => {
            let base = dirs::data_local_dir().ok_or_else(|| ConfigError::DirectoryNotFound {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("no platform data directory and {DATA_DIR_ENV_VAR} is unset"),
            })?;
            (base.join(APP_DIR_NAME), PathSource::PlatformDefault)
        }
    };

    let config_dir = dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| data_dir.clone());

    let paths = ConsolePaths {
        log_dir: data_dir.join("logs"),
        config_dir,
        assets_dir: detect_assets_dir(),
        data_dir,
        source,
    };

    debug!("Console paths resolved: {:?}", paths);
    Ok(paths)
}

/// `HOTSOS_ASSETS_DIR`, then `assets/` next to the executable, then `./assets`.
fn detect_assets_dir() -> PathBuf {
    if let Ok(dir) = env::var(ASSETS_DIR_ENV_VAR) {
        return PathBuf::from(dir);
    }

    if let Ok(exe_path) = env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        let candidate = exe_dir.join(ASSETS_DIR_NAME);
        if candidate.exists() {
            return candidate;
        }
    }

    PathBuf::from(ASSETS_DIR_NAME)
}
