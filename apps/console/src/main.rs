use hotsos_console::env_file::try_load_dotenv;
use hotsos_console::error::ConsoleError;
use hotsos_console::logger::{initialize as LoggerInitialize, log_file_path};
use hotsos_console::shell::Shell;

use session_core::AppContext;
use session_core::config::{EnvName, EnvironmentsConfig, detect_console_paths};

use common::ErrorLocation;

use std::fs::create_dir_all;
use std::panic::Location;

use log::{error, info, warn};
use tokio::io::{BufReader, stdin, stdout};

const VERBOSE_FLAGS: [&str; 2] = ["-v", "--verbose"];

#[tokio::main]
async fn main() -> Result<(), ConsoleError> {
    let verbose = std::env::args().skip(1).any(|arg| VERBOSE_FLAGS.contains(&arg.as_str()));

    // .env may relocate the data directory, so it is read before anything else
    let env_file = try_load_dotenv();

    let paths = detect_console_paths().map_err(|e| ConsoleError::Core {
        message: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;

    create_dir_all(&paths.log_dir).map_err(|e| ConsoleError::Console {
        message: format!("Failed to create log directory: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    LoggerInitialize(&paths.log_dir, verbose)?;

    info!("HotSOS console starting");
    info!("Log file: {}", log_file_path(&paths.log_dir).display());
    match (&env_file.path, &env_file.error) {
        (Some(path), _) => info!("Loaded .env from: {}", path.display()),
        (None, Some(e)) => warn!("Failed to parse .env at {}", e),
        (None, None) => info!("No .env file found, using process environment"),
    }
    info!("Data directory ({}): {}", paths.source, paths.data_dir.display());

    let env_name = EnvName::from_env();
    let environment = EnvironmentsConfig::load(&paths.config_dir)
        .and_then(|config| config.resolve(env_name))
        .map_err(|e| {
            error!("Environment configuration invalid: {}", e);
            ConsoleError::Core {
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

    info!(
        "Environment {} (production={}, mock_auth={}, api={})",
        environment.name, environment.production, environment.mock_auth, environment.api_base_url
    );

    let ctx = AppContext::build(environment, &paths).await.map_err(|e| {
        error!("Failed to build application context: {}", e);
        ConsoleError::Core {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    })?;

    ctx.initialize().await.map_err(|e| ConsoleError::Core {
        message: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let shell = Shell::new(ctx);
    let mut out = stdout();
    shell.run(BufReader::new(stdin()), &mut out).await
}
