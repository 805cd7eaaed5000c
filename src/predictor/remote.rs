//! Remote model client
//!
//! Sends one feature-named row per reading to an external scoring service.

use async_trait::async_trait;
use faultwatch_core::sensor::SensorReading;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;

use super::{Prediction, Predictor, PredictorError};

/// Configuration for the remote predictor
#[derive(Debug, Clone)]
pub struct RemotePredictorConfig {
    /// Scoring endpoint, receives a POST
    pub url: String,
    /// Probed by `ready()` when set
    pub health_url: Option<String>,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

pub struct RemotePredictor {
    client: Client,
    config: RemotePredictorConfig,
}

impl RemotePredictor {
    pub fn new(config: RemotePredictorConfig) -> Result<Self, PredictorError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Request body: feature name to value
    fn feature_row(reading: &SensorReading) -> BTreeMap<&'static str, f64> {
        reading
            .iter()
            .map(|(key, value)| (key.feature_name(), value))
            .collect()
    }
}

fn classify(e: reqwest::Error) -> PredictorError {
    if e.is_timeout() {
        PredictorError::Timeout
    } else if e.is_connect() {
        PredictorError::Unavailable
    } else {
        PredictorError::Request(e)
    }
}

#[derive(Debug, Deserialize)]
struct ScoreResponse {
    probability: f64,
    #[serde(default)]
    binary: Option<u8>,
    error_code: String,
    #[serde(default)]
    contributions: BTreeMap<String, f64>,
}

#[async_trait]
impl Predictor for RemotePredictor {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn predict(&self, reading: &SensorReading) -> Result<Prediction, PredictorError> {
        let response = self
            .client
            .post(&self.config.url)
            .json(&Self::feature_row(reading))
            .send()
            .await
            .map_err(classify)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PredictorError::Upstream {
                status: status.as_u16(),
                message: text,
            });
        }

        let score: ScoreResponse = response.json().await.map_err(classify)?;

        if !(0.0..=1.0).contains(&score.probability) {
            return Err(PredictorError::InvalidOutput(format!(
                "probability {} outside 0..1",
                score.probability
            )));
        }

        Ok(Prediction {
            probability: score.probability,
            fault: score
                .binary
                .map(|b| b == 1)
                .unwrap_or(score.probability >= 0.5),
            error_code: score.error_code,
            contributions: score.contributions,
        })
    }

    async fn ready(&self) -> bool {
        let Some(url) = &self.config.health_url else {
            return true;
        };

        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!(error = %e, "Model service health check failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faultwatch_core::sensor::SensorKey;

    fn config(url: &str) -> RemotePredictorConfig {
        RemotePredictorConfig {
            url: url.to_string(),
            health_url: None,
            request_timeout_ms: 500,
        }
    }

    #[test]
    fn test_feature_row_uses_model_columns() {
        let reading = SensorReading::from_fn(|key| key.index() as f64);
        let row = RemotePredictor::feature_row(&reading);

        assert_eq!(row.len(), SensorKey::COUNT);
        assert_eq!(row["CO2_Level(ppm)"], 6.0);
        assert_eq!(row["Temperature(°C)"], 0.0);
    }

    #[tokio::test]
    async fn test_ready_without_health_url() {
        let predictor = RemotePredictor::new(config("http://127.0.0.1:9/score")).unwrap();
        assert!(predictor.ready().await);
    }

    #[tokio::test]
    async fn test_unreachable_service_errors() {
        // Port 9 (discard) is closed on test machines
        let predictor = RemotePredictor::new(config("http://127.0.0.1:9/score")).unwrap();
        let result = predictor.predict(&SensorReading::default()).await;
        assert!(result.is_err());
    }
}
