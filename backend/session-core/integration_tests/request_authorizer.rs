use crate::helpers::AuthorizerHarness;

use session_core::error::{GENERIC_REQUEST_MESSAGE, OFFLINE_MESSAGE, RequestError, RequestFailure};
use session_core::request::ApiClient;

use common::RedactedToken;

use std::net::TcpListener;
use std::time::Duration;

use serde::Deserialize;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct RoomTask {
    room: String,
    status: String,
}

/// **VALUE**: With a committed session of token `tok-77`, the outbound call
/// carries `Authorization: Bearer tok-77`.
///
/// **WHY THIS MATTERS**: Every data-provider call is authorized this way.
#[tokio::test]
async fn given_committed_session_when_request_sent_then_bearer_token_attached() {
    // GIVEN: A session with token tok-77 and a server that requires it
    let harness = AuthorizerHarness::new();
    harness
        .session
        .commit(RedactedToken::new("tok-77"), "John Watson")
        .await
        .unwrap();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/housekeeping"))
        .and(header("authorization", "Bearer tok-77"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN: Sending a request through the authorizer
    let response = harness
        .authorizer
        .send(reqwest::Client::new().get(format!("{}/housekeeping", server.uri())))
        .await
        .unwrap();

    // THEN: The header matcher accepted it
    assert_eq!(response.status().as_u16(), 200);
    assert!(!harness.errors.is_open());
}

/// **VALUE**: A server error on an authorized call shows the generic message
/// and the caller still sees the original 500.
///
/// **BUG THIS CATCHES**: Would catch swallowing the failure after raising the
/// dialog, or raising the dialog without returning the failure.
#[tokio::test]
async fn given_server_error_when_request_sent_then_generic_message_and_original_failure() {
    let harness = AuthorizerHarness::new();
    harness
        .session
        .commit(RedactedToken::new("tok-77"), "John Watson")
        .await
        .unwrap();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/guests"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
        .mount(&server)
        .await;

    let err = harness
        .authorizer
        .send(reqwest::Client::new().get(format!("{}/guests", server.uri())))
        .await
        .unwrap_err();

    assert!(!err.is_offline());
    assert_eq!(err.status_code(), Some(500));
    assert!(matches!(
        err.failure(),
        Some(RequestFailure::Status { body, .. }) if body == "database down"
    ));
    assert_eq!(err.failure().map(RequestFailure::kind), Some("server error"));
    assert_eq!(err.user_message(), GENERIC_REQUEST_MESSAGE);
    assert!(harness.errors.is_open());
    assert_eq!(harness.errors.current().message, GENERIC_REQUEST_MESSAGE);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].headers["authorization"], "Bearer tok-77");
}

/// **VALUE**: A rejected token is an ordinary generic failure, labelled as an
/// auth rejection. Nothing clears the session or redirects.
#[tokio::test]
async fn given_rejected_token_when_request_sent_then_generic_failure_labelled_auth_rejected() {
    let harness = AuthorizerHarness::new();
    harness
        .session
        .commit(RedactedToken::new("tok-77"), "John Watson")
        .await
        .unwrap();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/guests"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = harness
        .authorizer
        .send(reqwest::Client::new().get(format!("{}/guests", server.uri())))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(401));
    assert_eq!(err.failure().map(RequestFailure::kind), Some("auth rejected"));
    assert_eq!(harness.errors.current().message, GENERIC_REQUEST_MESSAGE);
    assert!(harness.session.get().await.unwrap().is_some());
}

/// **VALUE**: Without a session the request goes out unauthenticated and the
/// server decides.
#[tokio::test]
async fn given_no_session_when_request_sent_then_no_authorization_header() {
    let harness = AuthorizerHarness::new();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/service-orders"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    harness
        .authorizer
        .send(reqwest::Client::new().get(format!("{}/service-orders", server.uri())))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0].headers.contains_key("authorization"));
}

/// **VALUE**: The same failure while the device is offline is classified as
/// offline and shows the offline message.
#[tokio::test]
async fn given_offline_when_request_fails_then_offline_classification() {
    let harness = AuthorizerHarness::new();
    harness.network.set_online(false);

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = harness
        .authorizer
        .send(reqwest::Client::new().get(server.uri()))
        .await
        .unwrap_err();

    assert!(err.is_offline());
    assert_eq!(harness.errors.current().message, OFFLINE_MESSAGE);
    assert_eq!(err.status_code(), Some(502));
}

/// **VALUE**: A connection failure is a transport failure, classified generic
/// while online.
///
/// **BUG THIS CATCHES**: Would catch a refused connection escaping without the
/// error dialog, or being reported as an HTTP status.
#[tokio::test]
async fn given_unreachable_server_when_request_sent_then_generic_transport_failure() {
    // GIVEN: A port nothing listens on any more
    let harness = AuthorizerHarness::new();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    // WHEN: Sending a request to it
    let err = harness
        .authorizer
        .send(reqwest::Client::new().get(format!("http://{addr}/guests")))
        .await
        .unwrap_err();

    // THEN: Transport failure, generic message, no status code
    assert!(!err.is_offline());
    assert!(matches!(err.failure(), Some(RequestFailure::Transport(_))));
    assert_eq!(err.status_code(), None);
    assert_eq!(err.failure().map(RequestFailure::kind), Some("transport"));
    assert_eq!(err.user_message(), GENERIC_REQUEST_MESSAGE);
    assert_eq!(harness.errors.current().message, GENERIC_REQUEST_MESSAGE);
}

/// **VALUE**: A server that accepts the connection but never answers ends in a
/// timeout, reported as a generic transport failure.
#[tokio::test]
async fn given_silent_server_when_client_times_out_then_generic_timeout_failure() {
    let harness = AuthorizerHarness::new();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepting = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(socket);
    });

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    let err = harness
        .authorizer
        .send(client.get(format!("http://{addr}/guests")))
        .await
        .unwrap_err();

    assert!(err.failure().is_some_and(RequestFailure::is_timeout));
    assert_eq!(err.failure().map(RequestFailure::kind), Some("timeout"));
    assert_eq!(harness.errors.current().message, GENERIC_REQUEST_MESSAGE);
    accepting.abort();
}

/// **VALUE**: The API client joins paths onto the base URL, authorizes, and
/// decodes JSON.
#[tokio::test]
async fn given_api_client_when_get_json_then_decoded_with_bearer() {
    let harness = AuthorizerHarness::new();
    harness
        .session
        .commit(RedactedToken::new("tok-12"), "Mary Morstan")
        .await
        .unwrap();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/housekeeping/204"))
        .and(header("authorization", "Bearer tok-12"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"room":"204","status":"dirty"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let base = Url::parse(&format!("{}/v1/", server.uri())).unwrap();
    let api = ApiClient::new(base, harness.authorizer.clone()).unwrap();

    let task: RoomTask = api.get_json("/housekeeping/204").await.unwrap();

    assert_eq!(
        task,
        RoomTask {
            room: "204".to_string(),
            status: "dirty".to_string()
        }
    );
}

/// **VALUE**: An undecodable body surfaces like any other failed request.
#[tokio::test]
async fn given_undecodable_body_when_get_json_then_generic_failure_raised() {
    let harness = AuthorizerHarness::new();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/guests/g-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let base = Url::parse(&format!("{}/", server.uri())).unwrap();
    let api = ApiClient::new(base, harness.authorizer.clone()).unwrap();

    let err = api.get_json::<RoomTask>("guests/g-1").await.unwrap_err();

    assert!(matches!(err.failure(), Some(RequestFailure::Body(_))));
    assert!(harness.errors.is_open());
}

/// **VALUE**: An absolute URL on another host is refused before anything is
/// sent, so the bearer token only ever goes to the data provider.
///
/// **BUG THIS CATCHES**: Would catch `Url::join` replacing the base with an
/// absolute path and leaking `Authorization: Bearer tok-77` to that host.
#[tokio::test]
async fn given_absolute_url_on_other_origin_when_get_json_then_refused_without_sending() {
    // GIVEN: A signed-in session, the data provider, and a second server
    let harness = AuthorizerHarness::new();
    harness
        .session
        .commit(RedactedToken::new("tok-77"), "John Watson")
        .await
        .unwrap();
    let provider = MockServer::start().await;
    let elsewhere = MockServer::start().await;
    let base = Url::parse(&format!("{}/v1/", provider.uri())).unwrap();
    let api = ApiClient::new(base, harness.authorizer.clone()).unwrap();

    // WHEN: Asking the client for a URL on the second server
    let err = api
        .get_json::<RoomTask>(&format!("{}/housekeeping/204", elsewhere.uri()))
        .await
        .unwrap_err();

    // THEN: Refused, nothing sent anywhere, no dialog
    assert!(matches!(err, RequestError::ForeignOrigin { .. }));
    assert!(err.failure().is_none());
    assert!(elsewhere.received_requests().await.unwrap().is_empty());
    assert!(provider.received_requests().await.unwrap().is_empty());
    assert!(!harness.errors.is_open());
}

#[test]
fn given_relative_or_same_origin_path_when_resolved_then_under_base_url() {
    let harness = AuthorizerHarness::new();
    let base = Url::parse("http://127.0.0.1:8080/v1/").unwrap();
    let api = ApiClient::new(base, harness.authorizer.clone()).unwrap();

    assert_eq!(
        api.resolve("/guests/g-1").unwrap().as_str(),
        "http://127.0.0.1:8080/v1/guests/g-1"
    );
    assert_eq!(
        api.resolve("http://127.0.0.1:8080/v1/rooms").unwrap().as_str(),
        "http://127.0.0.1:8080/v1/rooms"
    );
    assert!(matches!(
        api.resolve("https://127.0.0.1:8080/v1/rooms"),
        Err(RequestError::ForeignOrigin { .. })
    ));
}
