//! Scripted probe and recording sleeper for deterministic verifier tests.
//!
//! Neither touches the network or the real clock.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::probe::Probe;
use super::sleeper::Sleeper;
use crate::error::ProbeError;

/// Probe that replays a fixed list of results.
#[derive(Debug, Clone)]
pub struct ScriptedProbe {
    script: Arc<Mutex<VecDeque<Result<u16, ProbeError>>>>,
    fallback: Result<u16, ProbeError>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProbe {
    /// Replay `script` in order, then answer 200.
    pub fn new(script: Vec<Result<u16, ProbeError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            fallback: Ok(200),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer `fallback` once the script runs out.
    pub fn with_fallback(mut self, fallback: Result<u16, ProbeError>) -> Self {
        self.fallback = fallback;
        self
    }

    /// URLs requested so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Probe for ScriptedProbe {
    fn get(&self, url: &str) -> impl Future<Output = Result<u16, ProbeError>> + Send {
        self.calls.lock().unwrap().push(url.to_string());
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        std::future::ready(next)
    }
}

/// Sleeper that returns immediately and records each requested duration.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    /// Durations requested so far.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    /// Sum of all requested durations.
    pub fn total(&self) -> Duration {
        self.sleeps.lock().unwrap().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.sleeps.lock().unwrap().push(duration);
        std::future::ready(())
    }
}
