//! Verifier configuration loaded from environment variables.

use serde::Deserialize;

use crate::config::non_empty_or;
use crate::error::VerifyError;

/// In-cluster service address used when `APP_URL` is not set.
pub const DEFAULT_APP_URL: &str = "http://go-e2e-app-service:8080";
/// Path polled on the target.
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Default, Deserialize)]
struct RawVerifierConfig {
    #[serde(default)]
    app_url: Option<String>,
}

/// Where the verifier points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Base URL of the deployed service.
    pub app_url: String,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            app_url: DEFAULT_APP_URL.to_string(),
        }
    }
}

impl VerifierConfig {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env::<RawVerifierConfig>().map(Self::from_raw)
    }

    /// Load configuration from an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, RawVerifierConfig>(vars).map(Self::from_raw)
    }

    fn from_raw(raw: RawVerifierConfig) -> Self {
        Self {
            app_url: non_empty_or(raw.app_url, DEFAULT_APP_URL),
        }
    }

    /// Full URL polled by the verifier: base URL with `/health` appended.
    pub fn health_url(&self) -> String {
        format!("{}{}", self.app_url, HEALTH_PATH)
    }

    /// Check that the health URL parses.
    pub fn validate(&self) -> Result<(), VerifyError> {
        url::Url::parse(&self.health_url())
            .map(|_| ())
            .map_err(|e| VerifyError::InvalidUrl {
                url: self.app_url.clone(),
                reason: e.to_string(),
            })
    }
}
