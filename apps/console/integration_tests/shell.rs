use hotsos_console::commands::ConsoleCommand;
use hotsos_console::shell::{Flow, Shell};

use session_core::AppContext;
use session_core::config::{AppEnvironment, ConsolePaths};
use session_core::navigation::Route;

use tempfile::TempDir;

const CREDENTIALS: &str = r#"{ "pins": [ { "pin": "4821", "token": "tok-77", "user": "John Watson" } ] }"#;

/// Context over a temp root with the bundled table and no simulated latency.
async fn shell_in(dir: &TempDir) -> Shell {
    let paths = ConsolePaths::from_root(dir.path());
    let table = paths.mock_credentials_file();
    std::fs::create_dir_all(table.parent().unwrap()).unwrap();
    std::fs::write(&table, CREDENTIALS).unwrap();

    let environment = AppEnvironment {
        production: true,
        ..AppEnvironment::development()
    };
    let ctx = AppContext::build(environment, &paths).await.unwrap();
    ctx.initialize().await.unwrap();
    Shell::new(ctx)
}

async fn run_script(shell: &Shell, script: &str) -> String {
    let mut output = Vec::new();
    shell.run(script.as_bytes(), &mut output).await.unwrap();
    String::from_utf8(output).unwrap()
}

/// **VALUE**: Drives a whole console session from a script: blocked shell,
/// login in two steps, navigation, logout.
///
/// **WHY THIS MATTERS**: This is the binary's real loop with the real context;
/// it proves the commands, the error notices and the prompt fit together.
#[tokio::test]
async fn given_login_script_when_run_then_session_flows_through_console() {
    // GIVEN: A fresh console
    let dir = tempfile::tempdir().unwrap();
    let shell = shell_in(&dir).await;

    // WHEN: Running a scripted session
    let transcript = run_script(
        &shell,
        "open /shell/guests\npin 12\npin 4821\npassword secret\nopen /shell/guests/g-1\nwhoami\nlogout\nquit\n",
    )
    .await;

    // THEN: Each step shows up in order
    assert!(transcript.contains("Now at /login (requested /shell/guests)."));
    assert!(transcript.contains("Error: PIN must be at least 4 digits."));
    assert!(transcript.contains("Welcome John Watson. Enter your password."));
    assert!(transcript.contains("login:password> "));
    assert!(transcript.contains("Signed in as John Watson. Now at /shell/housekeeping."));
    assert!(transcript.contains("JW /shell/housekeeping> "));
    assert!(transcript.contains("Now at /shell/guests/g-1."));
    assert!(transcript.contains("John Watson (JW)"));
    assert!(transcript.contains("Signed out. Now at /login."));

    // AND: The error notice was dismissed after printing
    assert!(!shell.context().errors.is_open());
    assert_eq!(shell.context().router.current(), Route::Login);
}

/// **VALUE**: An offline PIN submission prints the offline notice and stays on
/// the PIN step.
#[tokio::test]
async fn given_offline_when_pin_entered_then_offline_notice_printed() {
    let dir = tempfile::tempdir().unwrap();
    let shell = shell_in(&dir).await;

    let transcript = run_script(&shell, "offline\npin 4821\nstatus\n").await;

    assert!(transcript.contains("Network marked offline."));
    assert!(transcript.contains("Error: Offline: Please check your connection."));
    assert!(transcript.contains("login-step=PIN network=offline"));
}

#[tokio::test]
async fn given_unknown_command_when_run_then_usage_printed_and_loop_continues() {
    let dir = tempfile::tempdir().unwrap();
    let shell = shell_in(&dir).await;

    let transcript = run_script(&shell, "dance\nwhoami\n").await;

    assert!(transcript.contains("Unknown command 'dance', type 'help'"));
    assert!(transcript.contains("Not signed in."));
}

/// **VALUE**: A password before any PIN is answered locally, with no error
/// notice and no session.
#[tokio::test]
async fn given_password_before_pin_when_executed_then_wrong_step_reply() {
    let dir = tempfile::tempdir().unwrap();
    let shell = shell_in(&dir).await;

    let flow = shell
        .execute(ConsoleCommand::Password("secret".to_string()))
        .await
        .unwrap();

    assert_eq!(
        flow,
        Flow::Continue(Some(
            "Not available now: awaiting PIN, expected awaiting password.".to_string()
        ))
    );
    assert!(shell.take_notice().is_none());
    assert!(shell.context().session.get().await.unwrap().is_none());
}

#[tokio::test]
async fn given_quit_when_executed_then_flow_quits() {
    let dir = tempfile::tempdir().unwrap();
    let shell = shell_in(&dir).await;

    assert_eq!(shell.execute(ConsoleCommand::Quit).await.unwrap(), Flow::Quit);
}

/// **VALUE**: `get` with an absolute URL on another host is refused with a
/// usage message and never turns into a request.
#[tokio::test]
async fn given_foreign_url_when_get_then_usage_message_and_no_notice() {
    let dir = tempfile::tempdir().unwrap();
    let shell = shell_in(&dir).await;

    let transcript = run_script(&shell, "get http://elsewhere.invalid/guests\nquit\n").await;

    assert!(transcript.contains("Cannot GET 'http://elsewhere.invalid/guests': not a data-provider path"));
    assert!(!transcript.contains("Error:"));
}
