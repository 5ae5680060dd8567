use crate::helpers::CREDENTIALS_BODY;

use session_core::auth::AuthenticationService;
use session_core::connectivity::NetworkStatus;
use session_core::credentials::{CredentialSource, HttpCredentialSource};
use session_core::error::AuthError;

use std::sync::Arc;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn credential_server(template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/pin"))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

fn endpoint(server: &MockServer) -> String {
    format!("{}/api/auth/pin", server.uri())
}

/// **VALUE**: Verifies the HTTP source parses the `{ "pins": [...] }` table and
/// the service matches against it.
///
/// **WHY THIS MATTERS**: Production verifies PINs against this endpoint with the
/// same shape as the bundled table.
#[tokio::test]
async fn given_credential_endpoint_when_verify_pin_then_matches_record() {
    // GIVEN: An endpoint serving two records
    let server = credential_server(
        ResponseTemplate::new(200).set_body_raw(CREDENTIALS_BODY, "application/json"),
    )
    .await;
    let source = HttpCredentialSource::from_url_str(&endpoint(&server)).unwrap();
    let auth = AuthenticationService::new(Arc::new(source), Arc::new(NetworkStatus::online()));

    // WHEN: Verifying a known PIN
    let matched = auth.verify_pin("4821").await.unwrap();

    // THEN: Token and user come from the matching record
    assert_eq!(matched.token.as_str(), "tok-77");
    assert_eq!(matched.user, "John Watson");
}

/// **VALUE**: Verifies the PIN lookup is sent without a bearer credential.
///
/// **BUG THIS CATCHES**: Would catch routing the lookup through the request
/// authorizer, which would leak a previous session's token.
#[tokio::test]
async fn given_credential_endpoint_when_fetched_then_no_authorization_header() {
    let server = credential_server(
        ResponseTemplate::new(200).set_body_raw(CREDENTIALS_BODY, "application/json"),
    )
    .await;
    let source = HttpCredentialSource::from_url_str(&endpoint(&server)).unwrap();

    let table = source.fetch_credentials().await.unwrap();

    assert_eq!(table.len(), 2);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

/// **VALUE**: Verifies a server error is a transport failure carrying the status.
///
/// **WHY THIS MATTERS**: The user must not be told their PIN is wrong when the
/// endpoint is failing.
#[tokio::test]
async fn given_server_error_when_verify_pin_then_transport_error_with_status() {
    let server = credential_server(ResponseTemplate::new(503).set_body_string("maintenance")).await;
    let source = HttpCredentialSource::from_url_str(&endpoint(&server)).unwrap();
    let auth = AuthenticationService::new(Arc::new(source), Arc::new(NetworkStatus::online()));

    let err = auth.verify_pin("4821").await.unwrap_err();

    assert!(matches!(err, AuthError::Transport { .. }));
    assert_eq!(err.status_code(), Some(503));
    assert!(err.to_string().contains("maintenance"));
}

#[tokio::test]
async fn given_malformed_body_when_fetched_then_format_error() {
    let server = credential_server(
        ResponseTemplate::new(200).set_body_raw(r#"{"pins": "nope"}"#, "application/json"),
    )
    .await;
    let source = HttpCredentialSource::from_url_str(&endpoint(&server)).unwrap();

    let err = source.fetch_credentials().await.unwrap_err();

    assert!(matches!(err, AuthError::Format { .. }));
}

#[tokio::test]
async fn given_unknown_pin_when_verified_against_endpoint_then_invalid_credential() {
    let server = credential_server(
        ResponseTemplate::new(200).set_body_raw(CREDENTIALS_BODY, "application/json"),
    )
    .await;
    let source = HttpCredentialSource::from_url_str(&endpoint(&server)).unwrap();
    let auth = AuthenticationService::new(Arc::new(source), Arc::new(NetworkStatus::online()));

    let err = auth.verify_pin("0000").await.unwrap_err();

    assert!(err.is_invalid_credential());
}

#[test]
fn given_invalid_url_when_source_created_then_format_error() {
    let result = HttpCredentialSource::from_url_str("not a url");

    assert!(matches!(result, Err(AuthError::Format { .. })));
}
