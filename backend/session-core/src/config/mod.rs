pub mod paths;

pub use paths::{ConsolePaths, PathSource, detect_console_paths};

use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::collections::HashMap;
use std::fmt;
use std::panic::Location;
use std::path::Path;
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use url::Url;

const ENVIRONMENTS_FILE_NAME: &str = "environments.toml";

/// Environment variable selecting the active profile.
pub const APP_ENV_VAR: &str = "APP_ENV";

const API_PREFIX: &str = "api";

/// Reserved PIN endpoint, relative to `api_base_url`.
pub const CREDENTIALS_ENDPOINT: &str = const_format::concatcp!(API_PREFIX, "/auth/pin");

/// Bundled credential table, relative to the assets directory.
pub const MOCK_CREDENTIALS_RESOURCE: &str = "mock/auth.json";

/// Artificial delay applied to PIN verification outside production.
pub const SIMULATED_LATENCY: Duration = Duration::from_millis(500);

// ============================================
// ENVIRONMENT NAMES
// ============================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnvName {
    #[default]
    Development,
    Qa,
    Production,
}

impl EnvName {
    /// Resolve a profile name, falling back to development for anything unknown.
    pub fn resolve(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("development") => EnvName::Development,
            Some("qa") => EnvName::Qa,
            Some("production") => EnvName::Production,
            Some(other) => {
                warn!("Unknown {APP_ENV_VAR} '{other}', using development");
                EnvName::Development
            }
            None => EnvName::Development,
        }
    }

    /// Resolve from the `APP_ENV` process environment variable.
    pub fn from_env() -> Self {
        Self::resolve(std::env::var(APP_ENV_VAR).ok().as_deref())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnvName::Development => "development",
            EnvName::Qa => "qa",
            EnvName::Production => "production",
        }
    }
}

impl fmt::Display for EnvName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================
// ENVIRONMENT PROFILE
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppEnvironment {
    pub name: EnvName,
    pub production: bool,
    pub api_base_url: String,
    pub app_name: String,
    /// `true` verifies PINs against the bundled table, `false` against the API.
    pub mock_auth: bool,
}

impl AppEnvironment {
    pub fn development() -> Self {
        Self {
            name: EnvName::Development,
            production: false,
            api_base_url: "http://localhost:4200".to_string(),
            app_name: "HotSOS Mobile (Dev)".to_string(),
            mock_auth: true,
        }
    }

    pub fn qa() -> Self {
        Self {
            name: EnvName::Qa,
            production: false,
            api_base_url: "https://qa-api.hotsos.example.com".to_string(),
            app_name: "HotSOS Mobile (QA)".to_string(),
            mock_auth: true,
        }
    }

    pub fn production() -> Self {
        Self {
            name: EnvName::Production,
            production: true,
            api_base_url: "https://api.hotsos.example.com".to_string(),
            app_name: "HotSOS Mobile".to_string(),
            mock_auth: false,
        }
    }

    pub fn builtin(name: EnvName) -> Self {
        match name {
            EnvName::Development => Self::development(),
            EnvName::Qa => Self::qa(),
            EnvName::Production => Self::production(),
        }
    }

    /// Delay applied to PIN verification results, `None` in production.
    pub fn simulated_latency(&self) -> Option<Duration> {
        if self.production {
            None
        } else {
            Some(SIMULATED_LATENCY)
        }
    }

    /// Parsed API base URL with a trailing slash so relative joins append.
    pub fn api_base(&self) -> Result<Url, ConfigError> {
        let mut base = self.api_base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }

        Url::parse(&base).map_err(|e| ConfigError::ValidationError {
            location: ErrorLocation::from(Location::caller()),
            reason: format!("Invalid api_base_url '{}': {}", self.api_base_url, e),
        })
    }

    /// `{api_base_url}/api/auth/pin`.
    pub fn credentials_url(&self) -> Result<Url, ConfigError> {
        self.api_base()?
            .join(CREDENTIALS_ENDPOINT)
            .map_err(|e| ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("Invalid credentials endpoint: {}", e),
            })
    }

    /// Validate profile values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for an empty app name or a
    /// base URL that is not http(s).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app_name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("app_name cannot be empty for {}", self.name),
            });
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("Invalid URL format: {}", self.api_base_url),
            });
        }

        self.api_base()?;
        Ok(())
    }
}

// ============================================
// OVERRIDES FILE
// ============================================

/// Per-profile overrides read from `environments.toml`. Unset fields keep the
/// built-in value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvironmentOverride {
    #[serde(default)]
    pub production: Option<bool>,
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub mock_auth: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentsConfig {
    #[serde(flatten)]
    pub overrides: HashMap<EnvName, EnvironmentOverride>,
}

impl EnvironmentsConfig {
    /// Load `{config_dir}/environments.toml`.
    ///
    /// # Returns
    ///
    /// Returns defaults (no overrides) when the file is missing.
    /// Returns `Err(ConfigError)` if the file exists but is unreadable or invalid.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(ENVIRONMENTS_FILE_NAME);

        if !path.exists() {
            info!(
                "Environments file not found at {}, using built-in profiles",
                path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
            location: ErrorLocation::from(Location::caller()),
            path: path.clone(),
            source: e,
        })?;

        let config: EnvironmentsConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: path.clone(),
                reason: e.to_string(),
            })?;

        info!("Environments loaded from {}", path.display());
        Ok(config)
    }

    /// Built-in profile for `name` with any override applied, validated.
    pub fn resolve(&self, name: EnvName) -> Result<AppEnvironment, ConfigError> {
        let mut environment = AppEnvironment::builtin(name);

        if let Some(o) = self.overrides.get(&name) {
            if let Some(production) = o.production {
                environment.production = production;
            }
            if let Some(ref url) = o.api_base_url {
                environment.api_base_url = url.clone();
            }
            if let Some(ref app_name) = o.app_name {
                environment.app_name = app_name.clone();
            }
            if let Some(mock_auth) = o.mock_auth {
                environment.mock_auth = mock_auth;
            }
        }

        environment.validate()?;
        Ok(environment)
    }
}
