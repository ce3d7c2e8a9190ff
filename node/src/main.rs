// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use wafwatch::{Broadcaster, EventStore};
use wafwatch_node::config::NodeConfig;
use wafwatch_node::errors::NodeError;
use wafwatch_node::server::{build_router, AppState};
use wafwatch_node::telemetry::init_telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), NodeError> {
    init_telemetry();

    let cfg = NodeConfig::from_env()?;
    tracing::info!("Initializing wafwatch node with config: {:?}", cfg);

    if !EventStore::new(&cfg.event_log_path).exists() {
        tracing::info!(
            "Event log {:?} not found. This is normal until the WAF records its first event.",
            cfg.event_log_path
        );
    }

    // One registry per process. Subscribers only see events ingested here.
    let broadcaster = Arc::new(Broadcaster::new());
    let shutdown = CancellationToken::new();
    let state = AppState::new(&cfg, broadcaster, shutdown.clone());
    let app = build_router(state, cfg.cors_allow_any);

    let addr = cfg.bind_addr;
    tracing::info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        // No signal handler: serve until killed.
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested, closing live streams");
    shutdown.cancel();
}
