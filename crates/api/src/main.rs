//! LearnArc - local learning-tracker service
//!
//! Main entry point for the HTTP server.

use std::sync::Arc;

use learnarc_lib::{router, AppContext};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging FIRST so we can see .env loading
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load environment variables from .env file
    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => warn!("no .env file found"),
    }

    let config = learnarc_infra::config::load()?;
    let bind_addr = config.server.bind_addr.clone();

    let ctx = Arc::new(AppContext::new(config).await?);
    let app = router(ctx.clone());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(%bind_addr, "learnarc listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    ctx.shutdown().await?;
    info!("learnarc stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
}
