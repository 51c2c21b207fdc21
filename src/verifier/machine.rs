//! Bounded health polling as an explicit state machine.

use std::time::Duration;

use tracing::{info, instrument, warn};

use super::config::VerifierConfig;
use super::probe::{HttpProbe, Probe};
use super::sleeper::{Sleeper, TokioSleeper};
use crate::error::{ProbeError, VerifyError};
use crate::metrics;

/// Retry budget and timing for the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Pause between a failed attempt and the next one.
    pub delay: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_secs(2),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Final verdict of a verifier run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The endpoint answered 200.
    Pass {
        /// Attempt on which it did.
        attempts: u32,
    },
    /// The run ended without a 200.
    Fail(VerifyError),
}

impl Outcome {
    /// Whether the run passed.
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass { .. })
    }

    /// Convert into a `Result` carrying the attempt count on success.
    pub fn into_result(self) -> Result<u32, VerifyError> {
        match self {
            Outcome::Pass { attempts } => Ok(attempts),
            Outcome::Fail(e) => Err(e),
        }
    }
}

/// Verifier state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// About to make attempt number `attempt` (1-based).
    Polling {
        /// Next attempt number.
        attempt: u32,
    },
    /// Finished.
    Done(Outcome),
}

impl PollPolicy {
    fn budget(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Next state after `attempt` produced `result`.
    ///
    /// Only transport failures are retried; a non-200 status ends the run.
    pub fn transition(&self, attempt: u32, result: Result<u16, ProbeError>) -> PollState {
        match result {
            Ok(200) => PollState::Done(Outcome::Pass { attempts: attempt }),
            Ok(status) => PollState::Done(Outcome::Fail(VerifyError::UnexpectedStatus {
                attempt,
                status,
            })),
            Err(_) if attempt < self.budget() => PollState::Polling {
                attempt: attempt + 1,
            },
            Err(last_error) => PollState::Done(Outcome::Fail(VerifyError::Exhausted {
                attempts: attempt,
                last_error,
            })),
        }
    }
}

/// Polls a health URL through an injected probe and sleeper.
#[derive(Debug, Clone)]
pub struct Verifier<P, S> {
    probe: P,
    sleeper: S,
    policy: PollPolicy,
}

impl Verifier<HttpProbe, TokioSleeper> {
    /// Verifier backed by a real HTTP client and the Tokio timer.
    pub fn http(policy: PollPolicy) -> Result<Self, reqwest::Error> {
        Ok(Self::new(HttpProbe::new(policy.timeout)?, TokioSleeper, policy))
    }
}

impl<P: Probe, S: Sleeper> Verifier<P, S> {
    /// Create a verifier from its parts.
    pub fn new(probe: P, sleeper: S, policy: PollPolicy) -> Self {
        Self {
            probe,
            sleeper,
            policy,
        }
    }

    /// Poll `url` until it answers 200 or the run fails.
    #[instrument(skip(self), fields(max_attempts = self.policy.max_attempts))]
    pub async fn run(&self, url: &str) -> Outcome {
        info!("Testing application health at: {}", url);

        let mut state = PollState::Polling { attempt: 1 };
        loop {
            let attempt = match state {
                PollState::Done(outcome) => {
                    match &outcome {
                        Outcome::Pass { attempts } => {
                            info!("Health check passed on attempt {}", attempts)
                        }
                        Outcome::Fail(e) => warn!("Health check failed: {}", e),
                    }
                    return outcome;
                }
                PollState::Polling { attempt } => attempt,
            };

            let result = self.probe.get(url).await;
            match &result {
                Ok(200) => metrics::inc_verify_attempts("ok"),
                Ok(_) => metrics::inc_verify_attempts("status"),
                Err(e) => {
                    metrics::inc_verify_attempts("error");
                    info!("Health check attempt {} failed: {}", attempt, e);
                }
            }

            state = self.policy.transition(attempt, result);
            if matches!(state, PollState::Polling { .. }) {
                self.sleeper.sleep(self.policy.delay).await;
            }
        }
    }
}

/// Validate `config`, then poll its health URL over HTTP with `policy`.
///
/// Returns the attempt on which the endpoint answered 200.
pub async fn run_verifier(config: &VerifierConfig, policy: PollPolicy) -> crate::Result<u32> {
    config.validate()?;
    let verifier = Verifier::http(policy)?;
    Ok(verifier.run(&config.health_url()).await.into_result()?)
}
