//! `.env` loading for the console binary.
//!
//! Runs before the logger exists (the file may set `HOTSOS_DATA_DIR`), so the
//! outcome is returned and logged by the caller once logging is up.

use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct EnvLoadResult {
    pub path: Option<PathBuf>,
    /// Parse failure for a `.env` that exists but could not be loaded.
    pub error: Option<String>,
}

impl EnvLoadResult {
    pub fn loaded(&self) -> bool {
        self.path.is_some()
    }
}

/// Load `.env` from the working directory, then from the executable's directory.
pub fn try_load_dotenv() -> EnvLoadResult {
    if let Ok(path) = dotenvy::dotenv() {
        return EnvLoadResult {
            path: Some(path),
            error: None,
        };
    }

    let mut result = EnvLoadResult::default();

    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        let env_path = exe_dir.join(".env");
        if env_path.exists() {
            match dotenvy::from_path(&env_path) {
                Ok(()) => result.path = Some(env_path),
                Err(e) => result.error = Some(format!("{}: {}", env_path.display(), e)),
            }
        }
    }

    result
}
