//! Mock API tests for the authenticated request pipeline.
//!
//! These tests use wiremock to simulate the scribe API and its refresh
//! endpoint, and check how many calls each scenario makes.

use std::sync::Arc;
use std::time::Duration;

use scribe_core::error::{AuthError, Error, TransportError};
use scribe_core::{ApiUrl, MemoryTokenStore, TokenPair, TokenStore};
use scribe_http::{ApiRequest, ClientConfig, REFRESH_PATH, Session};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROFILE: &str = "/api/user/profile";

/// Helper to create a client config pointing at a mock server.
fn mock_config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(ApiUrl::new(server.uri()).unwrap())
}

fn session_with(server: &MockServer, store: &Arc<MemoryTokenStore>) -> Session {
    Session::new(mock_config(server), store.clone()).unwrap()
}

fn logged_in(access: &str, refresh: &str) -> Arc<MemoryTokenStore> {
    Arc::new(MemoryTokenStore::with_pair(TokenPair::new(access, refresh)))
}

async fn mount_refresh(server: &MockServer, access: &str, refresh: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": access,
            "refreshToken": refresh
        })))
        .expect(times)
        .mount(server)
        .await;
}

async fn forbid_refresh(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

fn authorization_headers(request: &wiremock::Request) -> Vec<String> {
    request
        .headers
        .get_all("authorization")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// Credential Attachment
// ============================================================================

#[tokio::test]
async fn test_valid_token_attached_once_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;
    forbid_refresh(&server).await;

    let session = session_with(&server, &logged_in("A1", "R1"));
    let response = session
        .execute(&ApiRequest::get(PROFILE).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(authorization_headers(&requests[0]), vec!["Bearer A1"]);
}

#[tokio::test]
async fn test_anonymous_request_has_no_header_and_no_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE))
        .respond_with(ResponseTemplate::new(401).set_body_string("login required"))
        .expect(1)
        .mount(&server)
        .await;
    forbid_refresh(&server).await;

    let session = session_with(&server, &Arc::new(MemoryTokenStore::new()));
    let err = session
        .execute(&ApiRequest::get(PROFILE).unwrap())
        .await
        .unwrap_err();

    match err {
        Error::Http(e) => {
            assert_eq!(e.status, 401);
            assert_eq!(e.body, "login required");
        }
        other => panic!("expected passthrough 401, got {other:?}"),
    }

    let requests = server.received_requests().await.unwrap();
    assert!(authorization_headers(&requests[0]).is_empty());
}

#[tokio::test]
async fn test_tokens_are_read_per_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let session = session_with(&server, &store);
    assert!(!session.is_authenticated());

    session.login(&TokenPair::new("A1", "R1")).unwrap();
    assert!(session.is_authenticated());

    session
        .execute(&ApiRequest::get(PROFILE).unwrap())
        .await
        .unwrap();
}

// ============================================================================
// Refresh and Retry
// ============================================================================

#[tokio::test]
async fn test_expired_token_refreshed_and_retried_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .and(body_json(json!({"refreshToken": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "A2",
            "refreshToken": "R2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(PROFILE))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let store = logged_in("A1", "R1");
    let session = session_with(&server, &store);

    let response = session
        .execute(&ApiRequest::get(PROFILE).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"ok": true}));

    assert_eq!(store.read(), Some(TokenPair::new("A2", "R2")));
}

#[tokio::test]
async fn test_forbidden_also_triggers_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, "A2", "R2", 1).await;
    Mock::given(method("GET"))
        .and(path(PROFILE))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_with(&server, &logged_in("A1", "R1"));
    let response = session
        .execute(&ApiRequest::get(PROFILE).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_refresh_failure_expires_session_and_clears_store() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = logged_in("A1", "R1");
    let session = session_with(&server, &store);

    let err = session
        .execute(&ApiRequest::get(PROFILE).unwrap())
        .await
        .unwrap_err();

    assert!(err.is_session_expired(), "got {err:?}");
    assert!(store.read().is_none());
}

#[tokio::test]
async fn test_rejected_retry_is_passthrough_without_second_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE))
        .respond_with(ResponseTemplate::new(401).set_body_string("still no"))
        .expect(2)
        .mount(&server)
        .await;
    mount_refresh(&server, "A2", "R2", 1).await;

    let store = logged_in("A1", "R1");
    let session = session_with(&server, &store);

    let err = session
        .execute(&ApiRequest::get(PROFILE).unwrap())
        .await
        .unwrap_err();

    assert!(!err.is_session_expired());
    match err {
        Error::Http(e) => {
            assert_eq!(e.status, 401);
            assert_eq!(e.body, "still no");
        }
        other => panic!("expected passthrough 401, got {other:?}"),
    }
    // The refreshed pair is kept; only a failed refresh clears the store.
    assert_eq!(store.read(), Some(TokenPair::new("A2", "R2")));
}

#[tokio::test]
async fn test_forbidden_retry_is_passthrough_without_second_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, "A2", "R2", 1).await;
    Mock::given(method("GET"))
        .and(path(PROFILE))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .expect(1)
        .mount(&server)
        .await;

    let store = logged_in("A1", "R1");
    let session = session_with(&server, &store);
    let err = session
        .execute(&ApiRequest::get(PROFILE).unwrap())
        .await
        .unwrap_err();

    assert!(!err.is_session_expired());
    match err {
        Error::Http(e) => {
            assert_eq!(e.status, 403);
            assert_eq!(e.body, "forbidden");
        }
        other => panic!("expected passthrough 403, got {other:?}"),
    }
    assert_eq!(store.read(), Some(TokenPair::new("A2", "R2")));
}

#[tokio::test]
async fn test_retry_failure_with_other_status_is_passthrough() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    mount_refresh(&server, "A2", "R2", 1).await;
    Mock::given(method("GET"))
        .and(path(PROFILE))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_with(&server, &logged_in("A1", "R1"));
    let err = session
        .execute(&ApiRequest::get(PROFILE).unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(502));
}

#[tokio::test]
async fn test_post_body_is_resent_on_retry() {
    let server = MockServer::start().await;
    let payload = json!({"videoUrl": "https://example.com/v.mp4"});

    Mock::given(method("POST"))
        .and(path("/api/transcriptions"))
        .and(header("authorization", "Bearer A1"))
        .and(body_json(payload.clone()))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, "A2", "R2", 1).await;
    Mock::given(method("POST"))
        .and(path("/api/transcriptions"))
        .and(header("authorization", "Bearer A2"))
        .and(body_json(payload.clone()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "t1"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_with(&server, &logged_in("A1", "R1"));
    let request = ApiRequest::post("/api/transcriptions")
        .unwrap()
        .json(&payload)
        .unwrap();
    let response = session.execute(&request).await.unwrap();
    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn test_concurrent_rejections_may_both_refresh() {
    let server = MockServer::start().await;

    // No single-flight guard: each racing caller may refresh on its own.
    Mock::given(method("GET"))
        .and(path(PROFILE))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1..=2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "A2",
            "refreshToken": "R2"
        })))
        .expect(1..=2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(PROFILE))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1..=2)
        .mount(&server)
        .await;

    let store = logged_in("A1", "R1");
    let session = session_with(&server, &store);
    let request = ApiRequest::get(PROFILE).unwrap();

    let (first, second) = tokio::join!(session.execute(&request), session.execute(&request));
    assert_eq!(first.unwrap().status(), 200);
    assert_eq!(second.unwrap().status(), 200);
    assert_eq!(store.read(), Some(TokenPair::new("A2", "R2")));
}

// ============================================================================
// Passthrough and Transport Errors
// ============================================================================

#[tokio::test]
async fn test_server_error_passes_through_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE))
        .respond_with(ResponseTemplate::new(500).set_body_string("transcription backend down"))
        .expect(1)
        .mount(&server)
        .await;
    forbid_refresh(&server).await;

    let store = logged_in("A1", "R1");
    let session = session_with(&server, &store);
    let err = session
        .execute(&ApiRequest::get(PROFILE).unwrap())
        .await
        .unwrap_err();

    match err {
        Error::Http(e) => {
            assert_eq!(e.status, 500);
            assert_eq!(e.body, "transcription backend down");
        }
        other => panic!("expected passthrough 500, got {other:?}"),
    }
    assert!(store.read().is_some());
}

#[tokio::test]
async fn test_timeout_is_transport_error_not_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;
    forbid_refresh(&server).await;

    let store = logged_in("A1", "R1");
    let config = mock_config(&server).with_timeout(Duration::from_millis(100));
    let session = Session::new(config, store.clone()).unwrap();

    let err = session
        .execute(&ApiRequest::get(PROFILE).unwrap())
        .await
        .unwrap_err();

    assert!(
        matches!(err, Error::Transport(TransportError::Timeout { duration_ms: 100 })),
        "got {err:?}"
    );
    assert!(store.read().is_some());
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    let store = logged_in("A1", "R1");
    let config = ClientConfig::new(ApiUrl::new("http://127.0.0.1:1").unwrap());
    let session = Session::new(config, store.clone()).unwrap();

    let err = session
        .execute(&ApiRequest::get(PROFILE).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "got {err:?}");
    assert!(store.read().is_some());
}

// ============================================================================
// Tolerant Path
// ============================================================================

#[tokio::test]
async fn test_tolerant_returns_none_when_retry_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    mount_refresh(&server, "A2", "R2", 1).await;

    let session = session_with(&server, &logged_in("A1", "R1"));
    let result = session
        .execute_tolerant(&ApiRequest::get(PROFILE).unwrap())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_tolerant_returns_response_on_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let session = session_with(&server, &logged_in("A1", "R1"));
    let response = session
        .execute_tolerant(&ApiRequest::get(PROFILE).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_tolerant_anonymous_rejection_is_passthrough() {
    for status in [401u16, 403] {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(PROFILE))
            .respond_with(ResponseTemplate::new(status).set_body_string("login required"))
            .expect(1)
            .mount(&server)
            .await;
        forbid_refresh(&server).await;

        let session = session_with(&server, &Arc::new(MemoryTokenStore::new()));
        let err = session
            .execute_tolerant(&ApiRequest::get(PROFILE).unwrap())
            .await
            .unwrap_err();

        match err {
            Error::Http(e) => {
                assert_eq!(e.status, status);
                assert_eq!(e.body, "login required");
            }
            other => panic!("expected passthrough {status}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_tolerant_forbidden_retry_is_passthrough() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, "A2", "R2", 1).await;
    Mock::given(method("GET"))
        .and(path(PROFILE))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(403).set_body_string("plan required"))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_with(&server, &logged_in("A1", "R1"));
    let err = session
        .execute_tolerant(&ApiRequest::get(PROFILE).unwrap())
        .await
        .unwrap_err();

    assert!(!err.is_session_expired());
    match err {
        Error::Http(e) => {
            assert_eq!(e.status, 403);
            assert_eq!(e.body, "plan required");
        }
        other => panic!("expected passthrough 403, got {other:?}"),
    }
}

#[tokio::test]
async fn test_tolerant_refresh_failure_still_expires_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let store = logged_in("A1", "R1");
    let session = session_with(&server, &store);
    let err = session
        .execute_tolerant(&ApiRequest::get(PROFILE).unwrap())
        .await
        .unwrap_err();
    assert!(err.is_session_expired());
    assert!(store.read().is_none());
}

#[tokio::test]
async fn test_tolerant_other_errors_still_fail() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PROFILE))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such user"))
        .mount(&server)
        .await;

    let session = session_with(&server, &logged_in("A1", "R1"));
    let err = session
        .execute_tolerant(&ApiRequest::get(PROFILE).unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

// ============================================================================
// Refresh Coordinator
// ============================================================================

#[tokio::test]
async fn test_refresh_without_tokens_makes_no_call() {
    let server = MockServer::start().await;
    forbid_refresh(&server).await;

    let session = session_with(&server, &Arc::new(MemoryTokenStore::new()));
    let err = session.refresh().await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::RefreshFailed { .. })));
}

#[tokio::test]
async fn test_refresh_with_empty_refresh_token_makes_no_call() {
    let server = MockServer::start().await;
    forbid_refresh(&server).await;

    let store = logged_in("A1", "");
    let session = session_with(&server, &store);
    let err = session.refresh().await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::RefreshFailed { .. })));
    assert!(store.read().is_none());
}

#[tokio::test]
async fn test_refresh_response_missing_token_fails_closed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "A2"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = logged_in("A1", "R1");
    let session = session_with(&server, &store);
    let err = session.refresh().await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::RefreshFailed { .. })));
    assert!(store.read().is_none());
}

#[tokio::test]
async fn test_refresh_network_error_clears_store() {
    let store = logged_in("A1", "R1");
    let config = ClientConfig::new(ApiUrl::new("http://127.0.0.1:1").unwrap());
    let session = Session::new(config, store.clone()).unwrap();

    let err = session.refresh().await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::RefreshFailed { .. })));
    assert!(store.read().is_none());
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let server = MockServer::start().await;
    let store = logged_in("A1", "R1");
    let session = session_with(&server, &store);

    session.logout().unwrap();
    assert!(store.read().is_none());
    session.logout().unwrap();
    assert!(store.read().is_none());
}
