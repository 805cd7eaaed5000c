//! Wire Types
//!
//! JSON bodies exchanged between the dashboard and the prediction server.
//! The request body of `POST /predict` is a [`SensorReading`](crate::sensor::SensorReading).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A successful prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Likelihood of an error condition, 0–1
    pub probability: f64,
    pub error_code: String,
    pub error_description: String,
    /// Hard classification, 1 when a fault is predicted
    #[serde(default)]
    pub binary: u8,
    /// Per-feature attribution keyed by model feature name
    #[serde(default)]
    pub contributions: BTreeMap<String, f64>,
}

/// Raw body returned by `POST /predict`.
///
/// The server may send the usual fields alongside `error`; the presence of
/// `error` alone decides that the call failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributions: Option<BTreeMap<String, f64>>,
}

impl PredictReply {
    /// Reply carrying a prediction
    pub fn success(probability: f64, code: &str, description: &str) -> Self {
        Self {
            probability: Some(probability),
            error_code: Some(code.to_string()),
            error_description: Some(description.to_string()),
            ..Default::default()
        }
    }

    /// Reply carrying only a server-reported error
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    /// Split into a prediction or the reason there is none
    pub fn into_result(self) -> Result<PredictionResult, ReplyError> {
        if let Some(message) = self.error {
            return Err(ReplyError::Server(message));
        }

        let probability = self
            .probability
            .filter(|p| p.is_finite())
            .ok_or(ReplyError::Malformed("probability"))?;

        Ok(PredictionResult {
            probability,
            error_code: self.error_code.unwrap_or_default(),
            error_description: self.error_description.unwrap_or_default(),
            binary: self.binary.unwrap_or(0),
            contributions: self.contributions.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReplyError {
    /// The server set `error`
    #[error("{0}")]
    Server(String),

    /// A required field was missing or not a number
    #[error("Malformed prediction response: missing {0}")]
    Malformed(&'static str),
}

/// One historical prediction from `GET /logs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Server-formatted, shown verbatim
    pub timestamp: String,
    pub probability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl LogEntry {
    pub fn new(timestamp: impl Into<String>, probability: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            probability,
            error_code: None,
        }
    }
}

/// `round(probability * 100)` clamped into `0..=100`; NaN maps to 0
pub fn probability_percent(probability: f64) -> u8 {
    (probability * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_field_wins() {
        let reply: PredictReply = serde_json::from_str(
            r#"{"probability": 0, "error_code": "E000", "error": "model unavailable"}"#,
        )
        .unwrap();

        assert_eq!(
            reply.into_result(),
            Err(ReplyError::Server("model unavailable".to_string()))
        );
    }

    #[test]
    fn test_full_reply_decodes() {
        let reply: PredictReply = serde_json::from_str(
            r#"{
                "binary": 1,
                "probability": 0.8731,
                "error_code": "E004",
                "error_description": "High Vibration",
                "contributions": {"Vibration(mm/s)": 2.5}
            }"#,
        )
        .unwrap();

        let result = reply.into_result().unwrap();
        assert_eq!(result.binary, 1);
        assert_eq!(result.error_code, "E004");
        assert_eq!(result.contributions["Vibration(mm/s)"], 2.5);
    }

    #[test]
    fn test_missing_probability_is_malformed() {
        let reply: PredictReply = serde_json::from_str(r#"{"error_code": "E001"}"#).unwrap();
        assert_eq!(reply.into_result(), Err(ReplyError::Malformed("probability")));
    }

    #[test]
    fn test_log_entry_ignores_unknown_fields() {
        let entries: Vec<LogEntry> = serde_json::from_str(
            r#"[{"timestamp": "t1", "probability": 0.1, "extra": true}]"#,
        )
        .unwrap();
        assert_eq!(entries, vec![LogEntry::new("t1", 0.1)]);
    }

    #[test]
    fn test_probability_percent() {
        assert_eq!(probability_percent(0.42), 42);
        assert_eq!(probability_percent(0.005), 1);
        assert_eq!(probability_percent(0.0049), 0);
        assert_eq!(probability_percent(1.7), 100);
        assert_eq!(probability_percent(-0.3), 0);
        assert_eq!(probability_percent(f64::NAN), 0);
    }
}
