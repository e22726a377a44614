//! HTTP facade over the batch processor.
//!
//! Routes:
//! - `POST /caption-images/`: caption one folder (trailing slash optional)
//! - `GET /health`: engine readiness

mod error;
mod handlers;

use axum::routing::{get, post};
use axum::Router;
use glimpse_core::BatchProcessor;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    processor: Arc<BatchProcessor>,
    batch_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(processor: BatchProcessor) -> Self {
        Self {
            processor: Arc::new(processor),
            batch_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/caption-images/", post(handlers::caption_images))
        .route("/caption-images", post(handlers::caption_images))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, finishing in-flight requests");
}
