// ABOUTME: Entry point for the biomedic binary.
// ABOUTME: Parses CLI arguments, initializes tracing, and serves static files and equipment images.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use biomedic_server::{AppState, ServerConfig, create_router};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "biomedic")]
#[command(version, about = "Static file and equipment image server for the biomedic inventory")]
struct Args {
    /// Socket address to listen on (overrides BIOMEDIC_BIND)
    #[arg(long)]
    bind: Option<String>,

    /// Directory served as the static root (overrides BIOMEDIC_ROOT)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Directory of equipment images (overrides BIOMEDIC_IMAGES_DIR)
    #[arg(long)]
    images_dir: Option<PathBuf>,
}

impl Args {
    /// Command-line flags first, then the environment.
    fn lookup(&self, key: &str) -> Option<String> {
        let flag = match key {
            "BIOMEDIC_BIND" => self.bind.clone(),
            "BIOMEDIC_ROOT" => self.root.as_ref().map(|p| p.display().to_string()),
            "BIOMEDIC_IMAGES_DIR" => self.images_dir.as_ref().map(|p| p.display().to_string()),
            _ => None,
        };
        flag.or_else(|| std::env::var(key).ok())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(
                        "biomedic=debug,biomedic_core=debug,biomedic_store=debug,\
                         biomedic_server=debug,tower_http=debug",
                    )
                }),
        )
        .init();

    let args = Args::parse();
    let config = ServerConfig::from_lookup(|key| args.lookup(key))?;

    let state = Arc::new(AppState::from_config(&config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .inspect_err(|e| tracing::error!("failed to bind {}: {}", config.bind, e))
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!(
        "biomedic listening on http://{} (root {}, images {})",
        config.bind,
        config.root.display(),
        config.images_dir.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("server failed")?;

    tracing::info!("biomedic stopped");
    Ok(())
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(e) => {
                tracing::warn!("could not register SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("shutdown signal received, closing server");
}
