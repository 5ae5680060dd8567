use super::helpers::{CountingSource, KNOWN_PIN, KNOWN_TOKEN, KNOWN_USER, sample_table};
use crate::auth::{AuthenticationService, with_latency};
use crate::connectivity::NetworkStatus;
use crate::credentials::{CredentialRecord, CredentialTable, StaticCredentialSource};
use crate::error::{AuthError, FALLBACK_LOGIN_MESSAGE, INVALID_PIN_MESSAGE, OFFLINE_MESSAGE};

use std::sync::Arc;
use std::time::Duration;

fn service(source: Arc<CountingSource>, network: &NetworkStatus) -> AuthenticationService {
    AuthenticationService::new(source, Arc::new(network.clone()))
}

/// **VALUE**: Verifies an exact PIN match returns that record's token and user.
///
/// **WHY THIS MATTERS**: This is the only way a pending login comes into existence.
#[tokio::test]
async fn given_known_pin_when_verify_then_returns_token_and_user() {
    let source = Arc::new(CountingSource::serving(sample_table()));
    let auth = service(source.clone(), &NetworkStatus::online());

    let matched = auth.verify_pin(KNOWN_PIN).await.unwrap();

    assert_eq!(matched.token.as_str(), KNOWN_TOKEN);
    assert_eq!(matched.user, KNOWN_USER);
    assert_eq!(source.fetches(), 1);
}

/// **VALUE**: Verifies near-misses never match.
///
/// **BUG THIS CATCHES**: Would catch trimming, prefix matching or numeric
/// comparison (`"04821"` equal to `"4821"`).
#[tokio::test]
async fn given_non_matching_pins_when_verify_then_invalid_credential() {
    let auth = service(
        Arc::new(CountingSource::serving(sample_table())),
        &NetworkStatus::online(),
    );

    for pin in ["0000", "482", "48211", "04821", " 4821", "4821 "] {
        let err = auth.verify_pin(pin).await.unwrap_err();
        assert!(err.is_invalid_credential(), "pin {:?} gave {}", pin, err);
        assert_eq!(err.user_message(), INVALID_PIN_MESSAGE);
    }
}

#[tokio::test]
async fn given_duplicate_pins_when_verify_then_first_record_wins() {
    let table = CredentialTable::new(vec![
        CredentialRecord::new("5555", "tok-first", "First User"),
        CredentialRecord::new("5555", "tok-second", "Second User"),
    ]);
    let auth = service(
        Arc::new(CountingSource::serving(table)),
        &NetworkStatus::online(),
    );

    let matched = auth.verify_pin("5555").await.unwrap();

    assert_eq!(matched.user, "First User");
}

/// **VALUE**: Verifies the offline check happens before the credential source
/// is touched.
///
/// **WHY THIS MATTERS**: An offline device should fail fast with a clear
/// message instead of waiting for a network timeout.
#[tokio::test]
async fn given_offline_when_verify_then_offline_error_without_fetch() {
    let source = Arc::new(CountingSource::serving(sample_table()));
    let auth = service(source.clone(), &NetworkStatus::offline());

    let err = auth.verify_pin(KNOWN_PIN).await.unwrap_err();

    assert!(err.is_offline());
    assert_eq!(err.user_message(), OFFLINE_MESSAGE);
    assert_eq!(source.fetches(), 0);
}

/// **VALUE**: Verifies a fetch failure is propagated, never turned into
/// "invalid PIN".
///
/// **BUG THIS CATCHES**: Would catch swallowing transport failures and telling
/// the user their PIN is wrong when the server is down.
#[tokio::test]
async fn given_unreachable_source_when_verify_then_transport_error() {
    let auth = service(
        Arc::new(CountingSource::unreachable()),
        &NetworkStatus::online(),
    );

    let err = auth.verify_pin(KNOWN_PIN).await.unwrap_err();

    assert!(matches!(err, AuthError::Transport { .. }));
    assert_eq!(err.user_message(), FALLBACK_LOGIN_MESSAGE);
}

#[tokio::test]
async fn given_network_restored_when_verify_then_source_consulted() {
    let source = Arc::new(CountingSource::serving(sample_table()));
    let network = NetworkStatus::offline();
    let auth = service(source.clone(), &network);
    assert!(auth.verify_pin(KNOWN_PIN).await.is_err());

    network.set_online(true);

    assert!(auth.verify_pin(KNOWN_PIN).await.is_ok());
    assert_eq!(source.fetches(), 1);
}

/// **VALUE**: Verifies the simulated latency delays the result but never
/// changes it.
#[tokio::test(start_paused = true)]
async fn given_latency_when_verify_then_delayed_by_latency() {
    let auth = service(
        Arc::new(CountingSource::serving(sample_table())),
        &NetworkStatus::online(),
    )
    .with_simulated_latency(Some(Duration::from_millis(500)));
    let started = tokio::time::Instant::now();

    let matched = auth.verify_pin(KNOWN_PIN).await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(500));
    assert_eq!(matched.user, KNOWN_USER);
    assert_eq!(auth.simulated_latency(), Some(Duration::from_millis(500)));
}

#[tokio::test]
async fn given_no_latency_when_with_latency_then_value_unchanged() {
    assert_eq!(with_latency(None, 42).await, 42);
}

#[tokio::test]
async fn given_in_memory_static_source_when_verify_then_matches() {
    let source = Arc::new(StaticCredentialSource::from_table(sample_table()));
    let auth = AuthenticationService::new(source, Arc::new(NetworkStatus::online()));

    let matched = auth.verify_pin("1234").await.unwrap();

    assert_eq!(matched.token.as_str(), "tok-12");
}

/// **VALUE**: Verifies the bundled-file source reads the `{ "pins": [...] }`
/// shape and reports a missing file as a transport failure.
#[tokio::test]
async fn given_static_file_source_when_verify_then_reads_table_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("auth.json");
    std::fs::write(
        &path,
        r#"{ "pins": [ { "pin": "4821", "token": "tok-77", "user": "John Watson" } ] }"#,
    )
    .unwrap();

    let auth = AuthenticationService::new(
        Arc::new(StaticCredentialSource::from_file(&path)),
        Arc::new(NetworkStatus::online()),
    );
    assert_eq!(auth.verify_pin("4821").await.unwrap().user, "John Watson");

    let missing = AuthenticationService::new(
        Arc::new(StaticCredentialSource::from_file(dir.path().join("none.json"))),
        Arc::new(NetworkStatus::online()),
    );
    let err = missing.verify_pin("4821").await.unwrap_err();
    assert!(matches!(err, AuthError::Transport { status_code: None, .. }));
}

#[tokio::test]
async fn given_malformed_static_file_when_verify_then_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("auth.json");
    std::fs::write(&path, r#"{ "pins": [ { "pin": 4821 } ] }"#).unwrap();

    let auth = AuthenticationService::new(
        Arc::new(StaticCredentialSource::from_file(&path)),
        Arc::new(NetworkStatus::online()),
    );

    let err = auth.verify_pin("4821").await.unwrap_err();
    assert!(matches!(err, AuthError::Format { .. }));
}

#[test]
fn given_credential_record_when_debug_printed_then_pin_and_token_redacted() {
    let record = CredentialRecord::new("4821", "tok-77", "John Watson");

    let printed = format!("{:?}", record);

    assert!(!printed.contains("4821"));
    assert!(!printed.contains("tok-77"));
    assert!(printed.contains("John Watson"));
}
