//! Unified error types for the service and the verifier.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the service binary.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Verifier error.
    #[error("verify error: {0}")]
    Verify(#[from] VerifyError),

    /// Cluster credential discovery error.
    #[error("cluster error: {0}")]
    Cluster(#[from] ClusterError),

    /// HTTP client error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single health probe that did not complete.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The request did not complete within the per-request timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Connection refused, DNS failure, reset, and the like.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Terminal verifier failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// Every attempt failed at the transport level.
    #[error("health endpoint failed after {attempts} attempts: {last_error}")]
    Exhausted {
        /// Attempts made.
        attempts: u32,
        /// Error from the final attempt.
        last_error: ProbeError,
    },

    /// The endpoint answered with something other than 200.
    #[error("expected status 200, got {status} on attempt {attempt}")]
    UnexpectedStatus {
        /// Attempt that received the status.
        attempt: u32,
        /// Status code received.
        status: u16,
    },

    /// The configured base URL cannot be parsed.
    #[error("invalid application url {url}: {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Parser message.
        reason: String,
    },
}

/// Cluster credential discovery errors.
#[derive(Error, Debug)]
pub enum ClusterError {
    /// Neither in-cluster settings nor a kubeconfig file could be found.
    #[error("kubeconfig not found at {}", path.display())]
    KubeconfigMissing {
        /// Path that was checked.
        path: PathBuf,
    },

    /// No kubeconfig location could be derived (no KUBECONFIG and no HOME).
    #[error("no kubeconfig location: KUBECONFIG and HOME are both unset")]
    NoKubeconfigLocation,
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
