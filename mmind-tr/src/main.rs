//! mmind-tr (Transcription Relay)
//!
//! Accepts transcription requests for uploaded audio files, forwards the audio
//! URL to the transcription service, and stores transcripts and summaries.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use mmind_common::config::{load_toml_config, CompiledDefaults, ServiceConfig};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mmind_tr::cli::Args;
use mmind_tr::services::{SqliteStore, TranscriptionOrchestrator, WhisperClient};
use mmind_tr::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Configuration is resolved before tracing so the log level can come from it
    let defaults = CompiledDefaults::for_current_platform();
    let config_path = args.config_path(&defaults);
    let toml = match &config_path {
        Some(path) => load_toml_config(path)?,
        None => None,
    };
    let loaded_toml = toml.is_some();
    let config = ServiceConfig::resolve(args.overrides(), toml, &defaults)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "mmind_tr={lvl},mmind_common={lvl},tower_http={lvl}",
                    lvl = config.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting MeetingMind Transcription Relay (mmind-tr) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match (&config_path, loaded_toml) {
        (Some(path), true) => info!("Config file: {}", path.display()),
        _ => info!("No config file found, using command line, environment and defaults"),
    }

    info!("Database: {}", config.database_path.display());
    let pool = mmind_common::db::init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;
    info!("✓ Database ready");

    let transcriber = Arc::new(
        WhisperClient::new(config.transcription_url.clone())
            .context("Failed to create transcription client")?,
    );
    info!(
        "Transcription service: {} (timeout {}s)",
        transcriber.base_url(),
        config.transcription_timeout.as_secs()
    );

    let orchestrator = TranscriptionOrchestrator::new(
        Arc::new(SqliteStore::new(pool)),
        transcriber.clone(),
        config.transcription_timeout,
    );
    let state = AppState::new(orchestrator, transcriber);
    let app = build_router(state);

    let addr = format!("{}:{}", config.bind, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("mmind-tr listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

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
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
