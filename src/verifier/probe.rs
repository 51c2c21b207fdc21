//! Transport used by the verifier to issue a single health request.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::ProbeError;

/// Issues one GET and reports the status code.
pub trait Probe {
    /// GET `url`, returning the response status or why no response arrived.
    fn get(&self, url: &str) -> impl Future<Output = Result<u16, ProbeError>> + Send;
}

/// `reqwest`-backed probe with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    http: reqwest::Client,
}

impl HttpProbe {
    /// Build a probe whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

impl Probe for HttpProbe {
    fn get(&self, url: &str) -> impl Future<Output = Result<u16, ProbeError>> + Send {
        let request = self.http.get(url);
        async move {
            let response = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    ProbeError::Timeout(e.to_string())
                } else {
                    ProbeError::Transport(e.to_string())
                }
            })?;

            let status = response.status().as_u16();
            debug!(status, "Health probe response");
            Ok(status)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let probe = HttpProbe::new(Duration::from_secs(2)).unwrap();

        // Port 9 on loopback is discard; nothing listens there in test environments.
        let result = probe.get("http://127.0.0.1:9/health").await;

        assert!(matches!(result, Err(ProbeError::Transport(_)) | Err(ProbeError::Timeout(_))));
    }

    #[tokio::test]
    async fn malformed_url_is_transport_error() {
        let probe = HttpProbe::new(Duration::from_secs(1)).unwrap();

        let result = probe.get("not a url/health").await;

        assert!(matches!(result, Err(ProbeError::Transport(_))));
    }
}
