//! Cluster credential discovery for the verifier.
//!
//! In-cluster service account settings win; otherwise a kubeconfig file is
//! used, taken from `KUBECONFIG` or `$HOME/.kube/config`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ClusterError;

/// Directory holding the mounted service account credentials.
pub const SERVICE_ACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";
/// Timeout applied to cluster API clients built from discovered settings.
pub const CLUSTER_CLIENT_TIMEOUT: Duration = Duration::from_secs(60);

fn default_service_account_dir() -> PathBuf {
    PathBuf::from(SERVICE_ACCOUNT_DIR)
}

/// Environment consulted during discovery.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClusterEnv {
    /// `KUBERNETES_SERVICE_HOST`.
    #[serde(default)]
    pub kubernetes_service_host: Option<String>,
    /// `KUBERNETES_SERVICE_PORT`.
    #[serde(default)]
    pub kubernetes_service_port: Option<String>,
    /// `KUBECONFIG`.
    #[serde(default)]
    pub kubeconfig: Option<String>,
    /// `HOME`.
    #[serde(default)]
    pub home: Option<String>,
    /// Service account mount point.
    #[serde(skip, default = "default_service_account_dir")]
    pub service_account_dir: PathBuf,
}

impl ClusterEnv {
    /// Read discovery inputs from the process environment.
    pub fn load() -> Result<Self, envy::Error> {
        envy::from_env()
    }
}

/// Where cluster credentials come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Running inside a pod.
    InCluster {
        /// API server host.
        host: String,
        /// API server port.
        port: String,
        /// Service account token.
        token_path: PathBuf,
    },
    /// Local kubeconfig file.
    Kubeconfig(PathBuf),
}

/// Discovered cluster client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSettings {
    /// Credential source.
    pub source: CredentialSource,
    /// Client request timeout.
    pub timeout: Duration,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn in_cluster(env: &ClusterEnv) -> Result<CredentialSource, String> {
    let (Some(host), Some(port)) = (
        non_empty(&env.kubernetes_service_host),
        non_empty(&env.kubernetes_service_port),
    ) else {
        return Err(
            "KUBERNETES_SERVICE_HOST and KUBERNETES_SERVICE_PORT must be defined".to_string(),
        );
    };

    let token_path = env.service_account_dir.join("token");
    if !token_path.is_file() {
        return Err(format!(
            "service account token not found at {}",
            token_path.display()
        ));
    }

    Ok(CredentialSource::InCluster {
        host: host.to_string(),
        port: port.to_string(),
        token_path,
    })
}

fn kubeconfig_path(env: &ClusterEnv) -> Result<PathBuf, ClusterError> {
    if let Some(path) = non_empty(&env.kubeconfig) {
        return Ok(PathBuf::from(path));
    }
    non_empty(&env.home)
        .map(|home| Path::new(home).join(".kube").join("config"))
        .ok_or(ClusterError::NoKubeconfigLocation)
}

/// Discover cluster credentials: in-cluster first, then kubeconfig.
pub fn discover(env: &ClusterEnv) -> Result<ClusterSettings, ClusterError> {
    let source = match in_cluster(env) {
        Ok(source) => source,
        Err(reason) => {
            info!("Failed to get in-cluster config: {}", reason);

            let path = kubeconfig_path(env)?;
            if !path.is_file() {
                return Err(ClusterError::KubeconfigMissing { path });
            }
            CredentialSource::Kubeconfig(path)
        }
    };

    debug!(?source, "Cluster credentials discovered");
    Ok(ClusterSettings {
        source,
        timeout: CLUSTER_CLIENT_TIMEOUT,
    })
}

/// Read discovery inputs from the process environment and discover.
pub fn discover_from_env() -> crate::Result<ClusterSettings> {
    let env = ClusterEnv::load()?;
    Ok(discover(&env)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn env_in(dir: &Path) -> ClusterEnv {
        ClusterEnv {
            service_account_dir: dir.join("serviceaccount"),
            ..ClusterEnv::default()
        }
    }

    #[test]
    fn prefers_in_cluster_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let mut env = env_in(dir.path());
        fs::create_dir_all(&env.service_account_dir).unwrap();
        fs::write(env.service_account_dir.join("token"), "secret").unwrap();
        env.kubernetes_service_host = Some("10.0.0.1".to_string());
        env.kubernetes_service_port = Some("443".to_string());
        env.kubeconfig = Some("/nonexistent".to_string());

        let settings = discover(&env).unwrap();

        assert_eq!(
            settings.source,
            CredentialSource::InCluster {
                host: "10.0.0.1".to_string(),
                port: "443".to_string(),
                token_path: env.service_account_dir.join("token"),
            }
        );
        assert_eq!(settings.timeout, Duration::from_secs(60));
    }

    #[test]
    fn missing_token_falls_back_to_kubeconfig_env() {
        let dir = tempfile::tempdir().unwrap();
        let kubeconfig = dir.path().join("custom-config");
        fs::write(&kubeconfig, "apiVersion: v1").unwrap();

        let mut env = env_in(dir.path());
        env.kubernetes_service_host = Some("10.0.0.1".to_string());
        env.kubernetes_service_port = Some("443".to_string());
        env.kubeconfig = Some(kubeconfig.display().to_string());

        let settings = discover(&env).unwrap();

        assert_eq!(settings.source, CredentialSource::Kubeconfig(kubeconfig));
    }

    #[test]
    fn falls_back_to_home_kubeconfig() {
        let dir = tempfile::tempdir().unwrap();
        let kube_dir = dir.path().join(".kube");
        fs::create_dir_all(&kube_dir).unwrap();
        fs::write(kube_dir.join("config"), "apiVersion: v1").unwrap();

        let mut env = env_in(dir.path());
        env.home = Some(dir.path().display().to_string());
        env.kubeconfig = Some(String::new());

        let settings = discover(&env).unwrap();

        assert_eq!(
            settings.source,
            CredentialSource::Kubeconfig(kube_dir.join("config"))
        );
    }

    #[test]
    fn missing_kubeconfig_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut env = env_in(dir.path());
        env.home = Some(dir.path().display().to_string());

        let err = discover(&env).unwrap_err();

        assert!(matches!(err, ClusterError::KubeconfigMissing { .. }));
    }

    #[test]
    fn no_location_without_home_or_kubeconfig() {
        let dir = tempfile::tempdir().unwrap();
        let env = env_in(dir.path());

        assert!(matches!(
            discover(&env),
            Err(ClusterError::NoKubeconfigLocation)
        ));
    }
}
