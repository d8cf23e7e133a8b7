//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: config file → token exchange → device pages
//! → message fetch → registry validation → sink output → checkpoint file

use artik_sync::host::{
    Collaborators, DeviceRegistry, FaultReporter, JsonLinesSink, StaticRegistry,
};
use artik_sync::{Connector, ConnectorConfig, Error, StateManager, SyncStage};
use base64::Engine as _;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Default)]
struct RecordingReporter {
    reported: Mutex<Vec<(SyncStage, String)>>,
}

impl RecordingReporter {
    fn reported(&self) -> Vec<(SyncStage, String)> {
        self.reported.lock().unwrap().clone()
    }
}

impl FaultReporter for RecordingReporter {
    fn report_error(&self, error: &Error) {
        self.reported
            .lock()
            .unwrap()
            .push((error.stage(), error.to_string()));
    }
}

fn write_config(dir: &Path, server: &MockServer) -> std::path::PathBuf {
    let path = dir.join("artik.yaml");
    let yaml = format!(
        r#"
client_id: "client"
client_secret: "secret"
user_id: "acct-1"
token_url: "{uri}/token"
api_base_url: "{uri}/v1.1"
http:
  timeout_secs: 5
"#,
        uri = server.uri()
    );
    std::fs::write(&path, yaml).unwrap();
    path
}

fn start(
    config_path: &Path,
    registry: impl DeviceRegistry + 'static,
    output: &Path,
    state: StateManager,
) -> (Connector, Arc<RecordingReporter>) {
    let config = ConnectorConfig::from_file(config_path).unwrap();
    let reporter = Arc::new(RecordingReporter::default());
    let collaborators = Collaborators::new(
        Arc::new(registry),
        Arc::new(JsonLinesSink::append_to(output).unwrap()),
    )
    .with_reporter(reporter.clone());

    (
        Connector::start(&config, collaborators, state).unwrap(),
        reporter,
    )
}

async fn mount_token(server: &MockServer) {
    let basic = base64::engine::general_purpose::STANDARD.encode("client:secret");

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(header("Authorization", format!("Basic {basic}").as_str()))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok",
            "token_type": "bearer",
            "expires_in": 1209600
        })))
        .mount(server)
        .await;
}

async fn mount_device_page(server: &MockServer, offset: &str, ids: &[String]) {
    let devices: Vec<Value> = ids.iter().map(|id| json!({"id": id, "uid": "acct-1"})).collect();
    Mock::given(method("GET"))
        .and(path("/v1.1/users/acct-1/devices"))
        .and(query_param("offset", offset))
        .and(query_param("count", "100"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"devices": devices},
            "count": ids.len(),
        })))
        .mount(server)
        .await;
}

async fn mount_messages(server: &MockServer, sdid: &str, count: usize) {
    let data: Vec<Value> = (0..count)
        .map(|i| json!({"sdid": sdid, "ts": 1000 + i, "data": {"reading": i}}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/v1.1/messages"))
        .and(query_param("sdid", sdid))
        .and(query_param("count", "100"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": data})))
        .mount(server)
        .await;
}

fn read_lines(path: &Path) -> Vec<Value> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

async fn start_dates(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/v1.1/messages")
        .filter_map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "startDate")
                .map(|(_, v)| v.to_string())
        })
        .collect()
}

// ============================================================================
// End-to-end Sync
// ============================================================================

#[tokio::test]
async fn test_full_sync_flow() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_token(&server).await;
    let first_page: Vec<String> = (0..100).map(|i| format!("dev-{i}")).collect();
    mount_device_page(&server, "0", &first_page).await;
    mount_device_page(&server, "100", &["dev-100".to_string()]).await;
    mount_device_page(&server, "200", &[]).await;

    mount_messages(&server, "dev-0", 2).await;
    mount_messages(&server, "dev-100", 1).await;
    // Every other device has no messages
    Mock::given(method("GET"))
        .and(path("/v1.1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let config_path = write_config(dir.path(), &server);
    let output = dir.path().join("messages.jsonl");
    let state_path = dir.path().join("state.json");

    let (connector, reporter) = start(
        &config_path,
        StaticRegistry::with_ids(["dev-0", "dev-100"]),
        &output,
        StateManager::from_file(&state_path).unwrap(),
    );

    let report = connector.sync_from_checkpoint().await.unwrap();
    connector.close().await.unwrap();

    assert_eq!(report.stats.devices_enumerated, 101);
    assert_eq!(report.stats.devices_synced, 101);
    assert_eq!(report.stats.messages_forwarded, 3);
    assert!(reporter.reported().is_empty());

    let lines = read_lines(&output);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["device_id"], "dev-0");
    assert_eq!(
        lines[0]["payload"],
        json!({"sdid": "dev-0", "ts": 1000, "data": {"reading": 0}})
    );
    assert_eq!(lines[2]["device_id"], "dev-100");

    // Checkpoint persisted and reloadable
    let reloaded = StateManager::from_file(&state_path).unwrap();
    assert_eq!(reloaded.last_sync_time().await, Some(report.checkpoint()));

    // First run starts at the default window start
    assert!(start_dates(&server).await.iter().all(|d| d == "0"));
}

#[tokio::test]
async fn test_next_sync_starts_at_previous_checkpoint() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_token(&server).await;
    mount_device_page(&server, "0", &["d1".to_string()]).await;
    mount_device_page(&server, "100", &[]).await;
    mount_messages(&server, "d1", 1).await;

    let config_path = write_config(dir.path(), &server);
    let output = dir.path().join("out.jsonl");
    let state = StateManager::from_file(dir.path().join("state.json")).unwrap();

    let (connector, _) = start(&config_path, StaticRegistry::with_ids(["d1"]), &output, state);

    let first = connector.sync_from_checkpoint().await.unwrap();
    let second = connector.sync_from_checkpoint().await.unwrap();

    assert_eq!(second.window.start_time, first.checkpoint());
    assert_eq!(
        start_dates(&server).await,
        vec!["0".to_string(), first.checkpoint().to_string()]
    );
}

#[tokio::test]
async fn test_unregistered_device_reported_not_forwarded() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_token(&server).await;
    mount_device_page(&server, "0", &["known".to_string(), "stranger".to_string()]).await;
    mount_device_page(&server, "100", &[]).await;
    mount_messages(&server, "known", 1).await;
    mount_messages(&server, "stranger", 1).await;

    let config_path = write_config(dir.path(), &server);
    let output = dir.path().join("out.jsonl");
    let (connector, reporter) = start(
        &config_path,
        StaticRegistry::with_ids(["known"]),
        &output,
        StateManager::in_memory(),
    );

    let report = connector.sync(None).await.unwrap();
    connector.close().await.unwrap();

    assert_eq!(report.stats.messages_forwarded, 1);
    assert_eq!(report.stats.messages_rejected, 1);
    assert_eq!(
        reporter.reported(),
        vec![(
            SyncStage::Forward,
            "Device stranger is not registered.".to_string()
        )]
    );
    assert_eq!(read_lines(&output).len(), 1);
    assert!(connector.engine().state().last_sync_time().await.is_some());
}

// ============================================================================
// Failure Handling
// ============================================================================

#[tokio::test]
async fn test_device_page_failure_leaves_checkpoint() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_token(&server).await;
    let first_page: Vec<String> = (0..100).map(|i| format!("dev-{i}")).collect();
    mount_device_page(&server, "0", &first_page).await;
    Mock::given(method("GET"))
        .and(path("/v1.1/users/acct-1/devices"))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let state_path = dir.path().join("state.json");
    std::fs::write(&state_path, r#"{"last_sync_time": 1600000000000}"#).unwrap();

    let config_path = write_config(dir.path(), &server);
    let output = dir.path().join("out.jsonl");
    let (connector, reporter) = start(
        &config_path,
        StaticRegistry::new(),
        &output,
        StateManager::from_file(&state_path).unwrap(),
    );

    let err = connector.sync_from_checkpoint().await.unwrap_err();
    assert!(matches!(err, Error::DeviceList { .. }), "got {err:?}");

    let reported = reporter.reported();
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].0, SyncStage::DeviceList);

    let persisted: Value =
        serde_json::from_str(&std::fs::read_to_string(&state_path).unwrap()).unwrap();
    assert_eq!(persisted["last_sync_time"], 1_600_000_000_000_i64);
    assert!(read_lines(&output).is_empty());
}

#[tokio::test]
async fn test_invalid_credentials() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let config_path = write_config(dir.path(), &server);
    let output = dir.path().join("out.jsonl");
    let (connector, reporter) = start(
        &config_path,
        StaticRegistry::new(),
        &output,
        StateManager::in_memory(),
    );

    let check = connector.check().await;
    assert!(!check.success);
    assert!(check
        .message
        .unwrap()
        .contains("Invalid Credentials. No access token was received."));

    let err = connector.sync(None).await.unwrap_err();
    assert!(matches!(err, Error::Auth { .. }));
    assert_eq!(reporter.reported().len(), 1);
    assert!(connector.engine().state().last_sync_time().await.is_none());
}
