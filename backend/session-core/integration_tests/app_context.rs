use crate::helpers::CREDENTIALS_BODY;

use session_core::AppContext;
use session_core::config::{AppEnvironment, ConsolePaths};
use session_core::login::LoginProgress;
use session_core::navigation::Route;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_environment() -> AppEnvironment {
    AppEnvironment {
        production: true,
        ..AppEnvironment::development()
    }
}

fn write_mock_credentials(paths: &ConsolePaths) {
    let file = paths.mock_credentials_file();
    std::fs::create_dir_all(file.parent().unwrap()).unwrap();
    std::fs::write(file, CREDENTIALS_BODY).unwrap();
}

/// **VALUE**: The full path through the context: guard blocks the shell, the
/// two-step login commits, the shell opens, logout closes it again.
///
/// **WHY THIS MATTERS**: Exercises the wiring between every component with the
/// real file-backed store and the bundled credential table.
#[tokio::test]
async fn given_bundled_credentials_when_logging_in_and_out_then_guard_follows_session() {
    // GIVEN: A context over a temp root with the bundled table in place
    let dir = tempfile::tempdir().unwrap();
    let paths = ConsolePaths::from_root(dir.path());
    write_mock_credentials(&paths);
    let ctx = AppContext::build(mock_environment(), &paths).await.unwrap();
    ctx.initialize().await.unwrap();

    // THEN: The shell is closed before login
    assert_eq!(ctx.open("/shell/guests").await, Route::Login);

    // WHEN: Logging in with PIN then password
    let flow = ctx.login_flow();
    flow.submit_pin("4821").await.unwrap();
    let progress = flow.submit_password("secret").await.unwrap();

    // THEN: Landed on housekeeping with the session persisted
    assert_eq!(
        progress,
        LoginProgress::Committed {
            user: "John Watson".to_string(),
            landed: Route::Housekeeping
        }
    );
    assert_eq!(ctx.router.current(), Route::Housekeeping);
    assert_eq!(ctx.session.user_initials(), "JW");
    assert!(paths.preferences_file().exists());
    assert_eq!(ctx.open("/shell/guests/g-1").await, Route::GuestDetail("g-1".to_string()));

    // WHEN: Logging out
    let landed = ctx.logout().await.unwrap();

    // THEN: Back on login and the shell is closed again
    assert_eq!(landed, Route::Login);
    assert_eq!(ctx.session.current_user(), "");
    assert_eq!(ctx.open("/shell/housekeeping").await, Route::Login);
}

/// **VALUE**: A restart with a persisted session restores the user and lets
/// the shell open without logging in again.
#[tokio::test]
async fn given_persisted_session_when_context_rebuilt_then_user_restored() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ConsolePaths::from_root(dir.path());
    write_mock_credentials(&paths);
    {
        let ctx = AppContext::build(mock_environment(), &paths).await.unwrap();
        let flow = ctx.login_flow();
        flow.submit_pin("1234").await.unwrap();
        flow.submit_password("hunter22").await.unwrap();
    }

    let ctx = AppContext::build(mock_environment(), &paths).await.unwrap();
    assert_eq!(ctx.session.current_user(), "");
    ctx.initialize().await.unwrap();

    assert_eq!(ctx.session.current_user(), "Mary Morstan");
    assert_eq!(ctx.open("/shell/service-orders").await, Route::ServiceOrders);
}

/// **VALUE**: With `mock_auth` off the context verifies PINs against
/// `{api_base_url}/api/auth/pin`.
#[tokio::test]
async fn given_real_endpoint_environment_when_pin_submitted_then_endpoint_consulted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/pin"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(CREDENTIALS_BODY, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let environment = AppEnvironment {
        api_base_url: server.uri(),
        mock_auth: false,
        ..AppEnvironment::production()
    };
    let ctx = AppContext::build(environment, &ConsolePaths::from_root(dir.path()))
        .await
        .unwrap();

    let progress = ctx.login_flow().submit_pin("4821").await.unwrap();

    assert_eq!(
        progress,
        LoginProgress::AwaitingPassword {
            verified_user: "John Watson".to_string()
        }
    );
}

/// **VALUE**: A missing bundled table fails the lookup with the fallback
/// message instead of an invalid-PIN message.
#[tokio::test]
async fn given_missing_bundled_table_when_pin_submitted_then_fallback_message() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = AppContext::build(mock_environment(), &ConsolePaths::from_root(dir.path()))
        .await
        .unwrap();

    ctx.login_flow().submit_pin("4821").await.unwrap_err();

    assert_eq!(
        ctx.errors.current().message,
        "An error occurred. Please try again."
    );
}

#[tokio::test]
async fn given_offline_network_when_pin_submitted_then_offline_message() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ConsolePaths::from_root(dir.path());
    write_mock_credentials(&paths);
    let ctx = AppContext::build(mock_environment(), &paths).await.unwrap();

    ctx.network.set_online(false);
    ctx.login_flow().submit_pin("4821").await.unwrap_err();

    assert_eq!(
        ctx.errors.current().message,
        "Offline: Please check your connection."
    );
}
