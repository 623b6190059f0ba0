//! Prensa Server
//!
//! A self-hosted HTML-to-PDF rendering service. Accepts a URL or raw
//! HTML payload, renders it in a pooled headless Chromium instance,
//! and returns the PDF bytes.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prensa_server::config::Config;
use prensa_server::render::ChromiumLauncher;
use prensa_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prensa_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing::info!("Starting Prensa Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Recycle threshold: {}, default deadline: {}s",
        config.pool.recycle_after,
        config.pool.deadline_secs
    );

    // The engine launches lazily on the first request; only the
    // launcher (and its HTTP client) is built up front.
    let launcher =
        ChromiumLauncher::new(config.engine.clone()).context("Failed to build engine launcher")?;

    let app_state = AppState::new(config.clone(), Arc::new(launcher));
    let app = prensa_server::app(app_state.clone());

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid bind address")?;
    tracing::info!("Prensa Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind listener")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Close any live engine before exiting
    app_state.shutdown().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
