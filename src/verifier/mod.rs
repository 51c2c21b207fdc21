//! End-to-end verifier for a deployed instance.
//!
//! This module handles:
//! - Verifier configuration (`APP_URL`)
//! - The polling state machine and its retry policy
//! - Probe and sleeper seams, with a real HTTP/Tokio pair and test doubles
//! - Cluster credential discovery

pub mod cluster;
pub mod config;
pub mod machine;
pub mod mock;
pub mod probe;
pub mod sleeper;

pub use cluster::{discover, discover_from_env, ClusterEnv, ClusterSettings, CredentialSource};
pub use config::VerifierConfig;
pub use machine::{run_verifier, Outcome, PollPolicy, PollState, Verifier};
pub use mock::{RecordingSleeper, ScriptedProbe};
pub use probe::{HttpProbe, Probe};
pub use sleeper::{Sleeper, TokioSleeper};
