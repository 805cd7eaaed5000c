//! Predictors
//!
//! Turn a [`SensorReading`] into a fault probability and a fault code.
//!
//! - [`RangePredictor`]: scores how far each channel strays outside its safe range
//! - [`RemotePredictor`]: forwards the reading to an external model service
//!
//! Model training is out of scope; both predictors only score.

mod range;
mod remote;

pub use range::RangePredictor;
pub use remote::{RemotePredictor, RemotePredictorConfig};

use async_trait::async_trait;
use faultwatch_core::sensor::{SafeRanges, SensorReading};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{PredictorConfig, PredictorKind};

/// Raw model output for one reading
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Likelihood of a fault, 0–1
    pub probability: f64,
    /// Hard classification
    pub fault: bool,
    /// Most likely fault code, e.g. "E004"
    pub error_code: String,
    /// Per-feature attribution keyed by model feature name
    pub contributions: BTreeMap<String, f64>,
}

#[async_trait]
pub trait Predictor: Send + Sync {
    /// Short name for logs and health output
    fn name(&self) -> &'static str;

    async fn predict(&self, reading: &SensorReading) -> Result<Prediction, PredictorError>;

    /// Whether the predictor can currently serve requests
    async fn ready(&self) -> bool {
        true
    }
}

/// Errors that can occur while scoring a reading
#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("Model service unavailable")]
    Unavailable,

    #[error("Model request timed out")]
    Timeout,

    #[error("Model request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Model service error {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Invalid model output: {0}")]
    InvalidOutput(String),

    #[error("Predictor misconfigured: {0}")]
    Misconfigured(String),
}

/// Build the predictor selected in the config
pub fn build_predictor(
    config: &PredictorConfig,
    ranges: SafeRanges,
) -> Result<Arc<dyn Predictor>, PredictorError> {
    match config.kind {
        PredictorKind::Range => Ok(Arc::new(RangePredictor::new(
            ranges,
            config.bias,
            config.weight,
        ))),
        PredictorKind::Remote => {
            let url = config.url.clone().ok_or_else(|| {
                PredictorError::Misconfigured("no model service url configured".to_string())
            })?;

            let remote = RemotePredictor::new(RemotePredictorConfig {
                url,
                health_url: config.health_url.clone(),
                request_timeout_ms: config.timeout_ms,
            })?;
            Ok(Arc::new(remote))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_default_predictor() {
        let predictor =
            build_predictor(&PredictorConfig::default(), SafeRanges::default()).unwrap();
        assert_eq!(predictor.name(), "range");
    }

    #[test]
    fn test_build_remote_predictor() {
        let config = PredictorConfig {
            kind: PredictorKind::Remote,
            url: Some("http://localhost:9000/score".to_string()),
            ..Default::default()
        };
        let predictor = build_predictor(&config, SafeRanges::default()).unwrap();
        assert_eq!(predictor.name(), "remote");
    }
}
