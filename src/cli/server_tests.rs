//! Tests for the HTTP server routes

use super::router;
use crate::config::ConnectorConfig;
use crate::connector::Connector;
use crate::host::{AllowAllRegistry, ChannelSink, Collaborators};
use crate::state::StateManager;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn connector(server: &MockServer, state: StateManager) -> Arc<Connector> {
    let config = ConnectorConfig::new("client", "secret", "acct-1").with_endpoints(
        format!("{}/token", server.uri()),
        format!("{}/v1.1", server.uri()),
    );
    let (sink, _rx) = ChannelSink::new();
    let collaborators = Collaborators::new(Arc::new(AllowAllRegistry), Arc::new(sink));
    Arc::new(Connector::start(&config, collaborators, state).unwrap())
}

async fn mount_empty_account(server: &MockServer, token_delay: Duration) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "tok"}))
                .set_delay(token_delay),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1.1/users/acct-1/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"devices": []}})))
        .mount(server)
        .await;
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_sync(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/sync")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    let app = router(connector(&server, StateManager::in_memory()));

    let (status, body) = send(app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sync"]["phase"], "idle");
}

#[tokio::test]
async fn test_state_reports_checkpoint() {
    let server = MockServer::start().await;
    let state = StateManager::from_json(r#"{"last_sync_time": 1700000000000}"#).unwrap();
    let app = router(connector(&server, state));

    let (status, body) = send(app, get("/state")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["last_sync_time"], 1_700_000_000_000_i64);
    assert!(body["data"]["last_sync"].is_string());
}

#[tokio::test]
async fn test_sync_success_advances_checkpoint() {
    let server = MockServer::start().await;
    mount_empty_account(&server, Duration::ZERO).await;

    let connector = connector(&server, StateManager::in_memory());
    let app = router(Arc::clone(&connector));

    let (status, body) = send(app, post_sync(r#"{"last_sync_time": 10}"#)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["window"]["start_time"], 10);

    let checkpoint = connector.engine().state().last_sync_time().await;
    assert_eq!(checkpoint, body["data"]["checkpoint"].as_i64());
}

#[tokio::test]
async fn test_sync_abort_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "Bad client credentials"
        })))
        .mount(&server)
        .await;

    let app = router(connector(&server, StateManager::in_memory()));
    let (status, body) = send(app, post_sync("")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("invalid_client"));
}

#[tokio::test]
async fn test_sync_invalid_body() {
    let server = MockServer::start().await;
    let app = router(connector(&server, StateManager::in_memory()));

    let (status, _) = send(app, post_sync("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_overlapping_sync_is_conflict() {
    let server = MockServer::start().await;
    mount_empty_account(&server, Duration::from_millis(300)).await;

    let app = router(connector(&server, StateManager::in_memory()));

    let (first, second) = tokio::join!(send(app.clone(), post_sync("")), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        send(app.clone(), post_sync("")).await
    });

    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(second.0, StatusCode::CONFLICT);
}
