//! REST API for the simulated switch
//!
//! | Method | Path             | Handler                      |
//! |--------|------------------|------------------------------|
//! | GET    | `/`              | API info                     |
//! | GET    | `/version`       | name and version             |
//! | GET    | `/health`        | liveness and uptime          |
//! | GET    | `/switch/config` | configuration snapshot       |
//! | PUT    | `/switch/config` | apply a partial update       |
//!
//! Other methods on these paths get 405 from the router.

pub mod config;
pub mod errors;
pub mod health;

use axum::{Json, Router, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use switchsim_core::SwitchEngine;

pub use errors::ApiError;

/// Product name reported by `/` and `/version`
pub const PRODUCT_NAME: &str = "SwitchConfigSim";

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SwitchEngine>,
    /// Run the status action on every config read
    pub live_status: bool,
    pub started_at: DateTime<Utc>,
    started: Instant,
}

impl AppState {
    pub fn new(engine: Arc<SwitchEngine>, live_status: bool) -> Self {
        Self {
            engine,
            live_status,
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}

/// Build the API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api_info))
        .route("/version", get(version))
        .route("/health", get(health::health_check))
        .route(
            "/switch/config",
            get(config::get_config).put(config::update_config),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct ApiInfo {
    name: String,
    description: &'static str,
    endpoints: Vec<&'static str>,
}

async fn api_info() -> Json<ApiInfo> {
    Json(ApiInfo {
        name: format!("{PRODUCT_NAME} REST API"),
        description: "Simulated network switch management",
        endpoints: vec![
            "GET /version",
            "GET /health",
            "GET /switch/config",
            "PUT /switch/config",
        ],
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VersionInfo {
    name: &'static str,
    version: &'static str,
    built_with: &'static str,
}

async fn version() -> Json<VersionInfo> {
    Json(VersionInfo {
        name: PRODUCT_NAME,
        version: env!("CARGO_PKG_VERSION"),
        built_with: "Rust",
    })
}
