// Unit tests for logger module initialization logic
// Tests focus on idempotence and error handling

use crate::logger::{LOG_FILE_NAME, initialize, log_file_path};

use std::path::{Path, PathBuf};

/// **VALUE**: Verifies that calling initialize() multiple times doesn't panic or fail.
///
/// **WHY THIS MATTERS**: Tests and the binary may both reach initialization. A
/// second call that tried to install another global logger would fail startup.
///
/// **BUG THIS CATCHES**: Would catch if the Once or AtomicBool guards are removed,
/// causing fern to fail when setting a global logger twice.
#[test]
fn given_logger_initialized_when_called_again_then_returns_ok() {
    // GIVEN: A valid temporary directory
    let temp_dir = tempfile::tempdir().unwrap();

    // WHEN: Calling initialize twice
    let result1 = initialize(temp_dir.path(), false);
    let result2 = initialize(temp_dir.path(), true);

    // THEN: Both return Ok (the second only logs a warning)
    assert!(result1.is_ok(), "First initialization should succeed");
    assert!(
        result2.is_ok(),
        "Second initialization should succeed (idempotent)"
    );
}

/// **VALUE**: Verifies the log file lands in the log directory under the
/// console's file name.
#[test]
fn given_log_dir_when_log_file_path_then_joined_with_file_name() {
    let path = log_file_path(Path::new("/var/log/hotsos"));

    assert_eq!(path, PathBuf::from("/var/log/hotsos").join(LOG_FILE_NAME));
    assert_eq!(LOG_FILE_NAME, "hotsos-console.log");
}
