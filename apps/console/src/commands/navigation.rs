use crate::error::ConsoleError;

use session_core::AppContext;

use common::ErrorLocation;

use std::panic::Location;

use log::debug;

pub async fn open(ctx: &AppContext, path: &str) -> String {
    let landed = ctx.open(path).await;
    if landed.path() == path.trim_end_matches('/') {
        format!("Now at {landed}.")
    } else {
        format!("Now at {landed} (requested {path}).")
    }
}

/// Fetch `path` from the data provider and pretty-print the JSON.
///
/// A failed request is already on the error signal; it comes back as `None`.
/// A path that never became a request is a usage error.
pub async fn get(ctx: &AppContext, path: &str) -> Result<Option<String>, ConsoleError> {
    let value = match ctx.fetch_json::<serde_json::Value>(path).await {
        Ok(value) => value,
        Err(e) if e.failure().is_none() => {
            return Err(ConsoleError::Usage {
                message: format!("Cannot GET '{path}': not a data-provider path"),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Err(e) => {
            debug!("GET {} failed: {}", path, e);
            return Ok(None);
        }
    };

    serde_json::to_string_pretty(&value)
        .map(Some)
        .map_err(|e| ConsoleError::Console {
            message: format!("Failed to format response: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })
}
