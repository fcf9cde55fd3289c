//! End-to-end fetch cycles against the fixture source and a mock REST service

use std::fs;
use std::net::TcpListener;
use std::time::Duration;

use acctdash::config::Config;
use acctdash::services::{
    select_connection_view, BadgeVariant, ConnectionView, DashboardSession, FetchOutcome,
};
use acctdash::sources::{DataSource, FixtureDataSource, RestDataSource};
use acctdash::types::{DashboardSummary, Identity};
use chrono::Utc;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIXTURE_JSON: &str = r#"{
    "services": [
        {"user_id": "u-1", "price": 100, "status": "active"},
        {"user_id": "u-1", "price": 50.5, "status": "active"},
        {"user_id": "u-1", "price": 0, "status": "inactive"},
        {"user_id": "u-2", "price": 75, "status": "active"}
    ],
    "connections": [
        {"id": "c-1", "user_id": "u-1", "tool_name": "ChatGPT", "status": "connected",
         "last_used": "2024-12-12T09:30:00Z"},
        {"id": "c-2", "user_id": "u-1", "tool_name": "Claude", "status": "error"},
        {"id": "c-3", "user_id": "u-2", "tool_name": "Gemini", "status": "connected"}
    ]
}"#;

fn fixture_config(temp_dir: &TempDir, user_id: Option<&str>) -> Config {
    let path = temp_dir.path().join("fixture.json");
    fs::write(&path, FIXTURE_JSON).unwrap();
    Config::default().with_overrides(user_id.map(str::to_string), None, Some(path))
}

// ========== fixture source ==========

#[test]
fn test_fixture_cycle_computes_summary() {
    let temp_dir = TempDir::new().unwrap();
    let config = fixture_config(&temp_dir, Some("u-1"));
    let source = config.data_source().unwrap();

    let mut session = DashboardSession::new();
    let ticket = session.set_identity(config.identity()).unwrap();
    assert_eq!(session.run_fetch(&ticket, source.as_ref()), FetchOutcome::Applied);

    let summary = session.summary();
    assert_eq!(summary.active_service_count, 2);
    assert_eq!(summary.connected_tool_count, 1);
    assert!((summary.total_spent - 150.5).abs() < 1e-9);

    let ConnectionView::Populated(rows) =
        select_connection_view(session.connections(), session.is_loading(), Utc::now())
    else {
        panic!("expected populated view");
    };
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].badge, BadgeVariant::Affirmative);
    assert_eq!(rows[1].badge, BadgeVariant::Negative);
    assert_eq!(rows[1].last_used, "Never");
}

#[test]
fn test_fixture_cycle_switching_user() {
    let temp_dir = TempDir::new().unwrap();
    let config = fixture_config(&temp_dir, Some("u-1"));
    let source = config.data_source().unwrap();

    let mut session = DashboardSession::new();
    let first = session.set_identity(Some(Identity::new("u-1"))).unwrap();
    session.run_fetch(&first, source.as_ref());

    let second = session.set_identity(Some(Identity::new("u-2"))).unwrap();
    assert_eq!(session.run_fetch(&first, source.as_ref()), FetchOutcome::Stale);
    assert_eq!(session.run_fetch(&second, source.as_ref()), FetchOutcome::Applied);

    assert_eq!(
        *session.summary(),
        DashboardSummary {
            active_service_count: 1,
            connected_tool_count: 1,
            total_spent: 75.0,
        }
    );
}

#[test]
fn test_no_identity_stays_loading() {
    let temp_dir = TempDir::new().unwrap();
    let config = fixture_config(&temp_dir, None);

    let mut session = DashboardSession::new();
    assert!(session.set_identity(config.identity()).is_none());
    assert!(session.is_loading());
    assert_eq!(
        select_connection_view(session.connections(), session.is_loading(), Utc::now()),
        ConnectionView::Loading
    );
}

#[test]
fn test_unknown_user_is_empty() {
    let source = FixtureDataSource::from_records(Vec::new(), Vec::new());
    let mut session = DashboardSession::new();
    let ticket = session.set_identity(Some(Identity::new("nobody"))).unwrap();
    session.run_fetch(&ticket, &source);

    assert_eq!(*session.summary(), DashboardSummary::default());
    assert_eq!(
        select_connection_view(session.connections(), session.is_loading(), Utc::now()),
        ConnectionView::Empty
    );
}

// ========== REST source ==========

fn rest_source(base_url: &str) -> RestDataSource {
    RestDataSource::new(base_url, "anon-key", "user-jwt", Duration::from_secs(5)).unwrap()
}

/// The blocking client owns its own runtime, so it is built, used and
/// dropped off the async test thread.
async fn blocking<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap()
}

async fn mount_active_count(server: &MockServer, total: &str) {
    Mock::given(method("HEAD"))
        .and(path("/rest/v1/user_services"))
        .and(query_param("user_id", "eq.u-1"))
        .and(query_param("status", "eq.active"))
        .and(header("prefer", "count=exact"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer user-jwt"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-range", total))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rest_cycle_reads_all_three() {
    let server = MockServer::start().await;
    mount_active_count(&server, "*/2").await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/api_connections"))
        .and(query_param("user_id", "eq.u-1"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer user-jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "c-1", "user_id": "u-1", "tool_name": "ChatGPT",
             "status": "connected", "last_used": null},
            {"id": "c-2", "user_id": "u-1", "tool_name": "Claude",
             "status": "disconnected", "last_used": "2024-12-12T09:30:00"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/user_services"))
        .and(query_param("select", "price"))
        .and(query_param("user_id", "eq.u-1"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer user-jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"price": 100}, {"price": "50.5"}, {"price": null}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    let session = blocking(move || {
        let source = rest_source(&base_url);
        let mut session = DashboardSession::new();
        let ticket = session.set_identity(Some(Identity::new("u-1"))).unwrap();
        assert_eq!(session.run_fetch(&ticket, &source), FetchOutcome::Applied);
        session
    })
    .await;

    assert_eq!(session.summary().active_service_count, 2);
    assert_eq!(session.summary().connected_tool_count, 1);
    assert!((session.summary().total_spent - 150.5).abs() < 1e-9);

    let connections = session.connections();
    assert_eq!(connections.len(), 2);
    assert!(connections[0].last_used.is_none());
    assert!(connections[1].last_used.is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rest_failure_keeps_previous_summary() {
    let server = MockServer::start().await;
    mount_active_count(&server, "*/2").await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/api_connections"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "JWT expired"})))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    let (session, failure) = blocking(move || {
        let source = rest_source(&base_url);
        let mut session = DashboardSession::new();
        let ticket = session.set_identity(Some(Identity::new("u-1"))).unwrap();
        let result = source.fetch_all(&ticket.identity);
        let failure = result.clone().unwrap_err();
        assert_eq!(session.complete(&ticket, result), FetchOutcome::Failed);
        (session, failure)
    })
    .await;

    assert_eq!(failure.read, "list_connections");
    assert!(failure.message.contains("401"));
    assert!(!session.is_loading());
    assert_eq!(*session.summary(), DashboardSummary::default());
    assert_eq!(session.stats().failures, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rest_unknown_count_total_fails_read() {
    let server = MockServer::start().await;
    mount_active_count(&server, "*/*").await;

    let base_url = server.uri();
    let failure = blocking(move || {
        rest_source(&base_url)
            .count_active_services(&Identity::new("u-1"))
            .unwrap_err()
    })
    .await;

    assert_eq!(failure.read, "count_active_services");
    assert!(failure.message.contains("Content-Range"));
}

#[test]
fn test_rest_unreachable_service_fails_soft() {
    // Bind then drop to get a port with nothing listening
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let source = rest_source(&format!("http://127.0.0.1:{}", port));

    let mut session = DashboardSession::new();
    let ticket = session.set_identity(Some(Identity::new("u-1"))).unwrap();

    assert_eq!(session.run_fetch(&ticket, &source), FetchOutcome::Failed);
    assert!(!session.is_loading());
    assert_eq!(*session.summary(), DashboardSummary::default());
}
