//! Data Transfer Objects
//!
//! Response types for the API endpoints. Request and log shapes shared with
//! the dashboard live in `faultwatch_core::wire`.

use faultwatch_core::fault::FaultCode;
use faultwatch_core::wire::PredictionResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================
// PREDICT DTOs
// ============================================

/// Body of `POST /predict`, for success and failure alike
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    #[serde(flatten)]
    pub result: PredictionResult,
    /// Present only on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictResponse {
    pub fn ok(result: PredictionResult) -> Self {
        Self {
            result,
            error: None,
        }
    }

    /// Neutral prediction carrying the failure message
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            result: PredictionResult {
                probability: 0.0,
                error_code: FaultCode::E000.to_string(),
                error_description: "No fault detected - normal.".to_string(),
                binary: 0,
                contributions: BTreeMap::new(),
            },
            error: Some(message.into()),
        }
    }
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded
    pub status: String,
    /// Predictor name
    pub predictor: String,
    /// Predictor status: ok, unavailable
    pub predictor_status: String,
    /// Entries currently served by /logs
    pub log_entries: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_body_shape() {
        let body = serde_json::to_value(PredictResponse::failed("model unavailable")).unwrap();

        assert_eq!(body["error"], "model unavailable");
        assert_eq!(body["error_code"], "E000");
        assert_eq!(body["probability"], 0.0);
        assert_eq!(body["binary"], 0);
        assert!(body["contributions"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_ok_body_has_no_error() {
        let body = serde_json::to_value(PredictResponse::ok(PredictionResult {
            probability: 0.5,
            error_code: "E001".to_string(),
            error_description: "hot".to_string(),
            binary: 1,
            contributions: BTreeMap::new(),
        }))
        .unwrap();

        assert!(body.get("error").is_none());
        assert_eq!(body["error_code"], "E001");
    }
}
