//! HTTP boundary: a single conversion endpoint backed by the orchestrator.

mod orchestrator;
mod routes;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tubegrab_core::{TubeGrabError, TubeGrabResult};

pub use orchestrator::{Orchestrator, validate};
pub use routes::router;

pub async fn serve(host: &str, port: u16, orchestrator: Orchestrator) -> TubeGrabResult<()> {
    let listener = TcpListener::bind((host, port))
        .await
        .map_err(|err| TubeGrabError::Config(format!("failed to bind {host}:{port}: {err}")))?;
    let addr = listener
        .local_addr()
        .map_err(|err| TubeGrabError::Config(format!("failed to read local address: {err}")))?;
    info!(%addr, "conversion endpoint listening");

    axum::serve(listener, router(Arc::new(orchestrator)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| TubeGrabError::Network(format!("server error: {err}")))
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        warn!(error = %err, "failed to install Ctrl+C handler");
    }
    info!("shutting down");
}
