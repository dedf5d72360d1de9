//! HTTP endpoint
//!
//! Thin wrapper around the orchestrator: parse the question, run the
//! conversation, map the outcome to a status code.

mod dto;
mod error;
mod handlers;
mod router;

#[cfg(test)]
mod tests;

pub use dto::{AskRequest, AskResponse, HealthResponse};
pub use error::ApiError;
pub use router::router;

use crate::agent::Orchestrator;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }
}

/// Serve until Ctrl-C
pub async fn serve(orchestrator: Arc<Orchestrator>, address: &str) -> anyhow::Result<()> {
    let app = router(AppState::new(orchestrator));
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
