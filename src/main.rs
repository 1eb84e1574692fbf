use anyhow::{Context, Result};
use audio_browser::{create_router, AppState, Config, Overrides};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Browse and stream a library of recordings with their transcripts
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Configuration file, extension optional
    #[arg(short, long, default_value = "config/audio-browser")]
    config: String,

    /// Library root directory
    #[arg(long, env = "AUDIO_BASE_DIR")]
    root: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Verbose logging and the /api/debug endpoint
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let overrides = Overrides {
        root: args.root,
        bind: args.bind,
        port: args.port,
        debug: args.debug,
    };

    let cfg = Config::load_with(&args.config, &overrides)?;

    let default_level = if cfg.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("Audio Browser v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::from_config(&cfg)?;
    info!("Serving files from: {}", state.sandbox.root().display());
    info!("{} accounts configured", state.accounts.len());
    if cfg.debug {
        info!("Debug mode: /api/debug enabled");
    }

    let purge_task = state.sessions.spawn_purge_task();

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind((cfg.server.bind.as_str(), cfg.server.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", cfg.server.bind, cfg.server.port))?;

    info!(
        "Audio file server running at http://{}",
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    if let Some(task) = purge_task {
        task.abort();
    }
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown requested");
}
