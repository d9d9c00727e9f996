//! Web server for the alerting pipeline.

pub mod router;
pub mod state;

pub use router::{create_router, create_router_with_state};
pub use state::ServerState;

use std::net::SocketAddr;

/// Maximum accepted request body size (1 MiB).
pub const MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024;

/// Start the web server on a specific address.
pub async fn run(bind: SocketAddr) -> anyhow::Result<()> {
    let state = ServerState::new().await;
    run_with_state(bind, state).await
}

/// Start the web server over caller-provided state.
pub async fn run_with_state(bind: SocketAddr, state: ServerState) -> anyhow::Result<()> {
    // Surface adapter misconfiguration at startup without blocking it.
    if !state.pipeline.dispatcher().validate_all_adapters().await {
        tracing::warn!("one or more channel adapters failed configuration validation");
    }

    state.pipeline.start().await;

    let app = create_router_with_state(state.clone());
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(address = %bind, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.pipeline.stop().await;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
