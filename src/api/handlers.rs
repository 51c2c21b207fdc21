//! HTTP API handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::metrics;

/// Greeting returned by `/info`.
pub const INFO_MESSAGE: &str = "Hello from Go E2E Test App!";

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Configuration resolved once at startup.
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new app state.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy".
    pub status: &'static str,
    /// Time the request was handled.
    pub timestamp: DateTime<Utc>,
    /// Resolved `APP_VERSION`.
    pub version: String,
}

/// Info response.
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    /// Fixed greeting.
    pub message: &'static str,
    /// Host name of the process, empty if it could not be read.
    pub hostname: String,
    /// `APP_VERSION` and `ENVIRONMENT`.
    pub env: BTreeMap<&'static str, String>,
}

/// Host name of the machine, or an empty string.
pub fn host_name() -> String {
    gethostname::gethostname()
        .into_string()
        .unwrap_or_default()
}

/// Health check handler - always returns 200.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    metrics::inc_health_requests();

    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        version: state.config.app_version.clone(),
    })
}

/// Info handler - greeting, host name and the two reported settings.
pub async fn info(State(state): State<AppState>) -> impl IntoResponse {
    metrics::inc_info_requests();

    let env = BTreeMap::from([
        ("APP_VERSION", state.config.app_version.clone()),
        ("ENVIRONMENT", state.config.environment.clone()),
    ]);

    Json(InfoResponse {
        message: INFO_MESSAGE,
        hostname: host_name(),
        env,
    })
}

/// Redirect handler - 302 Found to `/info`.
pub async fn root() -> impl IntoResponse {
    metrics::inc_redirects();

    (StatusCode::FOUND, [(header::LOCATION, "/info")])
}
