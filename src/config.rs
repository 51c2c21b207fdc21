//! Service configuration loaded from environment variables.
//!
//! Every variable is optional. A variable that is unset or set to an empty
//! string resolves to its default; nothing is validated or coerced here.

use serde::Deserialize;

/// Default listening port.
pub const DEFAULT_PORT: &str = "8080";
/// Default application version reported by `/health` and `/info`.
pub const DEFAULT_APP_VERSION: &str = "dev";
/// Default deployment environment reported by `/info`.
pub const DEFAULT_ENVIRONMENT: &str = "development";
/// Default log output format.
pub const DEFAULT_LOG_FORMAT: &str = "pretty";

/// Return `value` when it is present and non-empty, otherwise `default`.
pub fn non_empty_or(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}

/// Resolve a single environment variable, falling back to `default`.
///
/// Reads the process environment on every call.
pub fn resolve(key: &str, default: &str) -> String {
    non_empty_or(std::env::var(key).ok(), default)
}

/// Environment as seen by `envy`, before defaults are applied.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    port: Option<String>,
    #[serde(default)]
    app_version: Option<String>,
    #[serde(default)]
    environment: Option<String>,
    #[serde(default)]
    log_format: Option<String>,
    #[serde(default)]
    metrics_port: Option<String>,
}

/// Resolved service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Listening port, kept as text and handed to the socket bind as is.
    pub port: String,
    /// `APP_VERSION`.
    pub app_version: String,
    /// `ENVIRONMENT`.
    pub environment: String,
    /// Log output format (`pretty` or `json`).
    pub log_format: String,
    /// Port for the Prometheus exporter, if one should be started.
    pub metrics_port: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_raw(RawConfig::default())
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env::<RawConfig>().map(Self::from_raw)
    }

    /// Load configuration from an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, RawConfig>(vars).map(Self::from_raw)
    }

    fn from_raw(raw: RawConfig) -> Self {
        Self {
            port: non_empty_or(raw.port, DEFAULT_PORT),
            app_version: non_empty_or(raw.app_version, DEFAULT_APP_VERSION),
            environment: non_empty_or(raw.environment, DEFAULT_ENVIRONMENT),
            log_format: non_empty_or(raw.log_format, DEFAULT_LOG_FORMAT),
            metrics_port: raw.metrics_port.filter(|p| !p.is_empty()),
        }
    }

    /// Address the HTTP server binds to.
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Whether logs should be emitted as JSON.
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}
