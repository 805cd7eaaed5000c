//! HTTP API Client
//!
//! Functions for communicating with the Faultwatch REST API.

use faultwatch_core::sensor::SensorReading;
use faultwatch_core::wire::{LogEntry, PredictReply};
use gloo_net::http::Request;

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

const API_URL_KEY: &str = "faultwatch_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    url.trim_end_matches('/').to_string()
}

/// Set the API base URL in local storage
pub fn set_api_base(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item(API_URL_KEY, url);
        }
    }
}

/// POST a reading to `/predict`.
///
/// The server answers failures with a 500 whose body still parses, so the
/// body is decoded regardless of status.
pub async fn submit_prediction(reading: &SensorReading) -> Result<PredictReply, String> {
    let api_base = get_api_base();

    let response = Request::post(&format!("{}/predict", api_base))
        .json(reading)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    decode_reply(status, &body)
}

/// GET `/logs`
pub async fn fetch_logs() -> Result<Vec<LogEntry>, String> {
    let api_base = get_api_base();

    let response = Request::get(&format!("{}/logs", api_base))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

fn decode_reply(status: u16, body: &str) -> Result<PredictReply, String> {
    let ok = (200..300).contains(&status);

    match serde_json::from_str::<PredictReply>(body) {
        Ok(reply) if ok || reply.error.is_some() => Ok(reply),
        Ok(_) => Err(format!("HTTP {}", status)),
        Err(_) if !ok => Err(format!("HTTP {}", status)),
        Err(e) => Err(format!("Parse error: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_on_500_is_a_reply() {
        let reply = decode_reply(500, r#"{"error": "model unavailable"}"#).unwrap();
        assert_eq!(reply.error.as_deref(), Some("model unavailable"));
    }

    #[test]
    fn test_unparseable_bodies() {
        assert_eq!(decode_reply(502, "Bad Gateway").unwrap_err(), "HTTP 502");
        assert!(decode_reply(200, "<html>").unwrap_err().starts_with("Parse error"));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_api_base_round_trips_through_storage() {
        set_api_base("http://plant-7:5000/");
        assert_eq!(get_api_base(), "http://plant-7:5000");

        set_api_base(DEFAULT_API_BASE);
        assert_eq!(get_api_base(), DEFAULT_API_BASE);
    }
}
