//! # Faultwatch
//!
//! Fault-risk dashboard for a filling line. The server scores eight sensor
//! readings and keeps a short history; the dashboard client validates input,
//! submits it and keeps its charts in step with the replies.
//!
//! ## Modules
//!
//! - [`api`]: REST API server with Axum (`/predict`, `/logs`, `/health`)
//! - [`predictor`]: Fault-probability scoring, built-in or remote
//! - [`history`]: Recent predictions and the CSV audit trail
//! - [`client`]: Native dashboard driver over HTTP
//! - [`config`]: TOML configuration with environment overrides
//! - [`telemetry`]: Tracing subscriber setup
//!
//! Domain types shared with the WASM page live in [`faultwatch_core`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use faultwatch::api::{serve, AppState};
//! use faultwatch::config::Config;
//! use faultwatch::history::PredictionHistory;
//! use faultwatch::predictor::build_predictor;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env();
//!
//!     let predictor = build_predictor(&config.predictor, config.safe_ranges())?;
//!     let history = Arc::new(PredictionHistory::new(config.history.capacity));
//!
//!     let state = AppState::new(predictor, history, config.api.clone());
//!     serve(state, &config.api).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod history;
pub mod predictor;
pub mod telemetry;

// Re-export top-level types for convenience
pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use client::{ClientError, DashboardApi, DashboardClient, HttpDashboardApi, SubmitFailure};

pub use config::{Config, ConfigError, HistoryConfig, LoggingConfig, PredictorConfig, PredictorKind};

pub use history::{CsvAudit, HistoryError, PredictionHistory};

pub use predictor::{build_predictor, Prediction, Predictor, PredictorError, RangePredictor};
