//! Prometheus metrics for request and probe counts.
//!
//! The exporter listens on its own port so the public routes stay exactly
//! `/health`, `/info` and the redirect.

use std::net::SocketAddr;

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use tracing::debug;

// === Metric Name Constants ===

/// `/health` requests served.
pub const METRIC_HEALTH_REQUESTS: &str = "http_health_requests_total";
/// `/info` requests served.
pub const METRIC_INFO_REQUESTS: &str = "http_info_requests_total";
/// Requests answered with the `/info` redirect.
pub const METRIC_REDIRECTS: &str = "http_redirects_total";
/// Verifier probe attempts, labelled by outcome.
pub const METRIC_VERIFY_ATTEMPTS: &str = "verify_attempts_total";

/// Initialize all metric descriptions.
///
/// Descriptions go to the recorder installed at call time, so this runs after
/// the exporter is in place.
pub fn init_metrics() {
    describe_counter!(METRIC_HEALTH_REQUESTS, "Total number of /health requests");
    describe_counter!(METRIC_INFO_REQUESTS, "Total number of /info requests");
    describe_counter!(METRIC_REDIRECTS, "Total number of redirects to /info");
    describe_counter!(
        METRIC_VERIFY_ATTEMPTS,
        "Total number of health probe attempts made by the verifier"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus exporter on `0.0.0.0:<port>` and describe metrics.
///
/// Must be called from within a Tokio runtime.
pub fn install_exporter(port: u16) -> Result<(), BuildError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    debug!(%addr, "Prometheus exporter installed");
    init_metrics();
    Ok(())
}

/// Increment the `/health` counter.
pub fn inc_health_requests() {
    counter!(METRIC_HEALTH_REQUESTS).increment(1);
}

/// Increment the `/info` counter.
pub fn inc_info_requests() {
    counter!(METRIC_INFO_REQUESTS).increment(1);
}

/// Increment the redirect counter.
pub fn inc_redirects() {
    counter!(METRIC_REDIRECTS).increment(1);
}

/// Record one verifier attempt with its outcome (`ok`, `status`, `error`).
pub fn inc_verify_attempts(outcome: &'static str) {
    counter!(METRIC_VERIFY_ATTEMPTS, "outcome" => outcome).increment(1);
}
