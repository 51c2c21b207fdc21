//! Minimal health/info HTTP service with an end-to-end polling verifier.
//!
//! The service answers three routes:
//!
//! ```text
//! GET /health  -> 200 {"status":"healthy","timestamp":...,"version":...}
//! GET /info    -> 200 {"message":...,"hostname":...,"env":{...}}
//! GET /        -> 302 Location: /info
//! ```
//!
//! The verifier polls `<APP_URL>/health` until it answers 200, retrying only
//! connection-level failures.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`api`]: HTTP routes and handlers
//! - [`verifier`]: Health polling, its configuration and cluster discovery
//! - [`metrics`]: Prometheus counters
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod utils;
pub mod verifier;

pub use config::Config;
pub use error::{AppError, Result};
