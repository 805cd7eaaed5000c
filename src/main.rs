//! Faultwatch API Server
//!
//! Run with: cargo run --bin faultwatch
//!
//! # Configuration
//!
//! Read from `--config`, or else the first of
//! `~/.config/faultwatch/config.toml`, `/etc/faultwatch/config.toml` and
//! `./config.toml`. Environment variables override the file:
//! - `FAULTWATCH_HOST`: Host to bind to (default: 0.0.0.0)
//! - `FAULTWATCH_PORT`: Port to listen on (default: 5000)
//! - `FAULTWATCH_PREDICTOR_URL`: Remote model service (default: built-in range scorer)
//! - `FAULTWATCH_AUDIT_CSV`: Append every prediction to this CSV file
//! - `FAULTWATCH_LOG_LEVEL`, `FAULTWATCH_LOG_FORMAT`: Logging
//! - `RUST_LOG`: Full filter directive, overrides the log level

use anyhow::Context;
use clap::Parser;
use faultwatch::api::{serve, AppState};
use faultwatch::config::Config;
use faultwatch::history::{CsvAudit, PredictionHistory};
use faultwatch::predictor::build_predictor;
use faultwatch::telemetry;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "faultwatch")]
#[command(author, version, about = "Faultwatch prediction server")]
struct Args {
    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on, overrides the configuration
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::load_default(),
    };
    if let Some(port) = args.port {
        config.api.port = port;
    }

    telemetry::init_tracing(&config.logging).context("installing tracing subscriber")?;

    tracing::info!("Starting Faultwatch API server v{}", env!("CARGO_PKG_VERSION"));

    let predictor = build_predictor(&config.predictor, config.safe_ranges())?;
    tracing::info!("Predictor: {}", predictor.name());

    if !predictor.ready().await {
        tracing::warn!("Predictor not ready yet, /predict will report errors until it is");
    }

    let mut history = PredictionHistory::new(config.history.capacity);
    if let Some(path) = &config.history.audit_csv {
        tracing::info!("Auditing predictions to {}", path);
        history = history.with_audit(CsvAudit::new(path));
    }

    let state = AppState::new(predictor, Arc::new(history), config.api.clone());

    tracing::info!("Starting server on {}:{}", config.api.host, config.api.port);
    serve(state, &config.api).await?;

    tracing::info!("Faultwatch API server stopped");
    Ok(())
}
