//! HTTP API route definitions.

use axum::{routing::any, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::error;

use super::handlers::{health, info, root, AppState};
use crate::utils::shutdown_signal;

/// Create the API router.
///
/// Routes accept any method. Every path other than `/health` and `/info`
/// falls through to the redirect.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", any(health))
        .route("/info", any(info))
        .route("/", any(root))
        .fallback(root)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the service socket. The address is not validated beforehand.
pub async fn bind(addr: &str) -> crate::Result<TcpListener> {
    TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind {}: {}", addr, e);
        crate::AppError::from(e)
    })
}

/// Serve the API on an already bound listener until a shutdown signal.
pub async fn serve(listener: TcpListener, state: AppState) -> crate::Result<()> {
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
