//! REST API tests, driving the router in-process with `tower::ServiceExt::oneshot`

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use switchsim_core::traits::{Action, ActionKind, ActionOutcome, ActionRunner};
use switchsim_core::{NoopActionRunner, SwitchConfig, SwitchEngine};
use switchsimd::{AppState, build_router};
use tower::ServiceExt;

/// Runner that fails every action of the listed kinds
struct FailingRunner {
    kinds: Vec<ActionKind>,
}

#[async_trait::async_trait]
impl ActionRunner for FailingRunner {
    async fn run(&self, action: &Action) -> switchsim_core::Result<ActionOutcome> {
        if self.kinds.contains(&action.kind()) {
            Ok(ActionOutcome::failed("device busy", "exit status: 1"))
        } else {
            Ok(ActionOutcome::succeeded("ok"))
        }
    }

    fn runner_name(&self) -> &'static str {
        "failing"
    }
}

/// Runner whose actions take a while and count completions, like a slow device script
struct SlowRunner {
    delay: Duration,
    completed: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl ActionRunner for SlowRunner {
    async fn run(&self, _action: &Action) -> switchsim_core::Result<ActionOutcome> {
        tokio::time::sleep(self.delay).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(ActionOutcome::succeeded("applied"))
    }

    fn runner_name(&self) -> &'static str {
        "slow"
    }
}

fn app_with(runner: Box<dyn ActionRunner>, live_status: bool) -> Router {
    let (engine, _events) =
        SwitchEngine::from_config(&SwitchConfig::default(), runner).expect("engine construction succeeds");
    build_router(AppState::new(Arc::new(engine), live_status))
}

fn app() -> Router {
    app_with(Box::new(NoopActionRunner), false)
}

async fn send(app: Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

#[tokio::test]
async fn get_config_returns_seed() {
    let (status, body) = send(app(), Method::GET, "/switch/config", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "hostname": "switch1",
            "interfaces": {"eth0": "up", "eth1": "down", "eth2": "up", "ethx": "up"},
            "status": "Operational"
        })
    );
}

#[tokio::test]
async fn put_config_applies_and_reports_changes() {
    let app = app();

    let (status, body) = send(
        app.clone(),
        Method::PUT,
        "/switch/config",
        Some(r#"{"hostname": "core-1", "interface": "eth1", "interface_state": "up"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Config Updated");
    assert_eq!(
        body["changes"],
        json!({"hostname": "switch1 -> core-1", "interface_eth1": "down -> up"})
    );
    assert_eq!(body["errors"], json!([]));
    assert_eq!(body["message"], "Configuration changes applied successfully");

    let (_, config) = send(app, Method::GET, "/switch/config", None).await;
    assert_eq!(config["hostname"], "core-1");
    assert_eq!(config["interfaces"]["eth1"], "up");
}

#[tokio::test]
async fn put_config_partial_failure_is_multi_status() {
    let app = app_with(
        Box::new(FailingRunner {
            kinds: vec![ActionKind::SetHostname],
        }),
        false,
    );

    let (status, body) = send(
        app,
        Method::PUT,
        "/switch/config",
        Some(r#"{"hostname": "core-1", "status": "Maintenance"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::MULTI_STATUS);
    assert_eq!(body["status"], "Partially Applied");
    assert_eq!(body["changes"], json!({"status": "Operational -> Maintenance"}));
    assert_eq!(body["errors"][0]["field"], "hostname");
    assert_eq!(body["errors"][0]["kind"], "external_action_failure");
    assert_eq!(body["errors"][0]["output"], "device busy");
}

#[tokio::test]
async fn put_config_unknown_interface_is_unprocessable() {
    let (status, body) = send(
        app(),
        Method::PUT,
        "/switch/config",
        Some(r#"{"interface": "eth9", "interface_state": "up"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "Update Failed");
    assert_eq!(body["errors"][0]["field"], "interface_eth9");
    assert_eq!(body["errors"][0]["kind"], "unknown_interface");
}

#[tokio::test]
async fn put_config_empty_object_is_no_op() {
    let (status, body) = send(app(), Method::PUT, "/switch/config", Some("{}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "No Changes");
    assert_eq!(body["changes"], json!({}));
}

#[tokio::test]
async fn put_config_invalid_json_is_bad_request() {
    let (status, body) = send(app(), Method::PUT, "/switch/config", Some("{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "malformed_request");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn put_config_ignores_content_type() {
    let app = app();

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/switch/config")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(r#"{"status":"Maintenance"}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // No content type at all, as with a bare client
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/switch/config")
        .body(Body::from(r#"{"hostname":"core-1"}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (_, config) = send(app, Method::GET, "/switch/config", None).await;
    assert_eq!(config["status"], "Maintenance");
    assert_eq!(config["hostname"], "core-1");
}

#[tokio::test]
async fn update_survives_client_going_away_mid_action() {
    let completed = Arc::new(AtomicUsize::new(0));
    let app = app_with(
        Box::new(SlowRunner {
            delay: Duration::from_millis(300),
            completed: Arc::clone(&completed),
        }),
        false,
    );

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/switch/config")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"hostname": "core-1"}"#))
        .unwrap();

    // The caller gives up while the action is still running
    let abandoned = tokio::time::timeout(Duration::from_millis(50), app.clone().oneshot(request)).await;
    assert!(abandoned.is_err(), "request should still be in flight");

    tokio::time::sleep(Duration::from_millis(800)).await;

    // The device was changed, so the store must have caught up
    assert_eq!(completed.load(Ordering::SeqCst), 1);
    let (_, config) = send(app, Method::GET, "/switch/config", None).await;
    assert_eq!(config["hostname"], "core-1");
}

#[tokio::test]
async fn unsupported_method_is_rejected() {
    let (status, _) = send(app(), Method::DELETE, "/switch/config", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = send(app(), Method::POST, "/version", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn info_and_version_endpoints() {
    let (status, info) = send(app(), Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["name"], "SwitchConfigSim REST API");
    assert!(
        info["endpoints"]
            .as_array()
            .unwrap()
            .contains(&json!("PUT /switch/config"))
    );

    let (status, version) = send(app(), Method::GET, "/version", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(version["name"], "SwitchConfigSim");
    assert_eq!(version["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(version["builtWith"], "Rust");
}

#[tokio::test]
async fn health_reports_revision() {
    let app = app();

    send(
        app.clone(),
        Method::PUT,
        "/switch/config",
        Some(r#"{"status": "Maintenance"}"#),
    )
    .await;

    let (status, health) = send(app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "UP");
    assert_eq!(health["revision"], 1);
    assert!(health["started_at"].is_string());
    assert!(health["uptime_secs"].is_u64());
}

#[tokio::test]
async fn live_status_failure_is_server_error() {
    let app = app_with(
        Box::new(FailingRunner {
            kinds: vec![ActionKind::GetStatus],
        }),
        true,
    );

    let (status, body) = send(app, Method::GET, "/switch/config", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "external_action_failure");
    assert_eq!(body["output"], "device busy");
}

#[tokio::test]
async fn live_status_success_returns_snapshot() {
    let app = app_with(Box::new(FailingRunner { kinds: vec![] }), true);

    let (status, body) = send(app, Method::GET, "/switch/config", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hostname"], "switch1");
}
