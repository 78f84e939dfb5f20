//! survey-server - survey answers and photo upload backend
//!
//! Startup order: load `.env`, initialize tracing, parse configuration,
//! create the storage roots (fatal on failure), then serve until Ctrl+C or
//! SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use survey_server::config::Args;
use survey_server::{build_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "survey_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting survey-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = ServerConfig::from(Args::parse());
    info!("Data directory: {}", config.data_dir.display());
    info!("Upload directory: {}", config.upload_dir.display());
    info!("Client directory: {}", config.client_dir.display());
    if config.base_url.is_empty() {
        info!("Upload URLs are root-relative");
    } else {
        info!("Upload URL base: {}", config.base_url);
    }

    let state = AppState::new(config);
    state
        .store
        .ensure_directories()
        .context("Failed to create storage directories")?;

    let addr = state.config.listen_addr;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("survey-server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
