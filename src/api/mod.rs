//! HTTP API module for the health, info and redirect endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::{bind, create_router, serve};
