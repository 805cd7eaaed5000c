//! Predict Route
//!
//! - POST /predict - Score one set of sensor values
//!
//! Input is coerced leniently: numbers pass through, numeric strings are
//! parsed, a list contributes its first element, and anything else counts
//! as 0. Failures still answer with a full body plus an `error` field.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use chrono::Local;
use faultwatch_core::fault::{self, FaultCode};
use faultwatch_core::sensor::{SensorKey, SensorReading};
use faultwatch_core::wire::{LogEntry, PredictionResult};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::api::dto::PredictResponse;
use crate::api::state::AppState;
use crate::history::TIMESTAMP_FORMAT;
use crate::predictor::Prediction;

/// Below this probability the fault code is reported as E000
pub const NO_FAULT_THRESHOLD: f64 = 0.05;

/// POST /predict
pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> (StatusCode, Json<PredictResponse>) {
    let payload = match parse_payload(&body) {
        Ok(payload) => payload,
        Err(message) => return failure(message),
    };

    let reading = coerce_reading(&payload);

    let prediction = match state.predictor.predict(&reading).await {
        Ok(prediction) => prediction,
        Err(e) => {
            tracing::error!(predictor = state.predictor.name(), error = %e, "Prediction failed");
            return failure(e.to_string());
        }
    };

    let result = to_result(prediction);

    tracing::info!(
        probability = result.probability,
        error_code = %result.error_code,
        "Prediction served"
    );

    let entry = LogEntry {
        timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        probability: result.probability,
        error_code: Some(result.error_code.clone()),
    };

    if let Err(e) = state.history.record(entry, &reading).await {
        tracing::warn!(error = %e, "Failed to write prediction audit row");
    }

    (StatusCode::OK, Json(PredictResponse::ok(result)))
}

fn failure(message: String) -> (StatusCode, Json<PredictResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(PredictResponse::failed(message)),
    )
}

/// An empty body counts as an empty object
fn parse_payload(body: &[u8]) -> Result<Map<String, Value>, String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(Map::new()),
        Ok(_) => Err("Request body must be a JSON object".to_string()),
        Err(e) => Err(format!("Invalid JSON body: {}", e)),
    }
}

/// Build a reading from a loosely typed JSON object
pub fn coerce_reading(payload: &Map<String, Value>) -> SensorReading {
    SensorReading::from_fn(|key: SensorKey| coerce_value(payload.get(key.as_str())))
}

fn coerce_value(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Array(items)) => coerce_scalar(items.first()),
        other => coerce_scalar(other),
    }
}

fn coerce_scalar(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn to_result(prediction: Prediction) -> PredictionResult {
    let error_code = if prediction.probability < NO_FAULT_THRESHOLD {
        FaultCode::E000.to_string()
    } else {
        prediction.error_code
    };

    PredictionResult {
        probability: round4(prediction.probability),
        error_description: fault::describe(&error_code).to_string(),
        error_code,
        binary: u8::from(prediction.fault),
        contributions: prediction.contributions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_coercion_rules() {
        let reading = coerce_reading(&object(json!({
            "temp": 25.5,
            "pressure": "3.2",
            "flow": [40, 50],
            "vibration": "abc",
            "fillheight": null,
            "power": true,
            "co2": [],
        })));

        assert_eq!(reading.temp, 25.5);
        assert_eq!(reading.pressure, 3.2);
        assert_eq!(reading.flow, 40.0);
        assert_eq!(reading.vibration, 0.0);
        assert_eq!(reading.fillheight, 0.0);
        assert_eq!(reading.power, 1.0);
        assert_eq!(reading.co2, 0.0);
        assert_eq!(reading.humidity, 0.0);
    }

    #[test]
    fn test_parse_payload() {
        assert!(parse_payload(b"").unwrap().is_empty());
        assert!(parse_payload(b"null").unwrap().is_empty());
        assert!(parse_payload(b"[1, 2]").is_err());
        assert!(parse_payload(b"{not json").is_err());
        assert_eq!(parse_payload(br#"{"temp": 1}"#).unwrap().len(), 1);
    }

    #[test]
    fn test_low_probability_forces_no_fault() {
        let result = to_result(Prediction {
            probability: 0.049,
            fault: false,
            error_code: "E003".to_string(),
            contributions: BTreeMap::new(),
        });

        assert_eq!(result.error_code, "E000");
        assert_eq!(result.error_description, FaultCode::E000.description());
    }

    #[test]
    fn test_result_rounding_and_description() {
        let result = to_result(Prediction {
            probability: 0.873_149,
            fault: true,
            error_code: "E004".to_string(),
            contributions: BTreeMap::new(),
        });

        assert_eq!(result.probability, 0.8731);
        assert_eq!(result.binary, 1);
        assert_eq!(result.error_description, FaultCode::E004.description());
    }
}
