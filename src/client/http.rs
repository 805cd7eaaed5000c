//! Dashboard HTTP API
//!
//! Thin reqwest wrapper around `POST /predict` and `GET /logs`.

use async_trait::async_trait;
use faultwatch_core::sensor::SensorReading;
use faultwatch_core::wire::{LogEntry, PredictReply};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::api::dto::HealthResponse;

/// Calls the dashboard makes against the prediction server
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Submit a reading. Error bodies that still parse are returned as a reply.
    async fn predict(&self, reading: &SensorReading) -> Result<PredictReply, ClientError>;

    /// Fetch the recent prediction history
    async fn logs(&self) -> Result<Vec<LogEntry>, ClientError>;
}

/// Dashboard API over HTTP
pub struct HttpDashboardApi {
    client: Client,
    base_url: String,
}

impl HttpDashboardApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `/health`
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await.map_err(classify)?;

        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| ClientError::Decode(e.to_string()))
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::Status {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn predict(&self, reading: &SensorReading) -> Result<PredictReply, ClientError> {
        let url = format!("{}/predict", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(reading)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let text = response.text().await.map_err(classify)?;

        decode_reply(status.as_u16(), status.is_success(), &text)
    }

    async fn logs(&self) -> Result<Vec<LogEntry>, ClientError> {
        let url = format!("{}/logs", self.base_url);

        let response = self.client.get(&url).send().await.map_err(classify)?;

        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| ClientError::Decode(e.to_string()))
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::Status {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}

/// A failing status is only a transport error when its body carries no
/// `error` field to report.
fn decode_reply(status: u16, success: bool, body: &str) -> Result<PredictReply, ClientError> {
    match serde_json::from_str::<PredictReply>(body) {
        Ok(reply) if success || reply.error.is_some() => Ok(reply),
        Ok(_) => Err(ClientError::Status {
            status,
            message: body.to_string(),
        }),
        Err(_) if !success => Err(ClientError::Status {
            status,
            message: body.to_string(),
        }),
        Err(e) => Err(ClientError::Decode(e.to_string())),
    }
}

fn classify(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else if e.is_connect() {
        ClientError::Unavailable
    } else {
        ClientError::Request(e)
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Server unavailable")]
    Unavailable,

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response body: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_is_a_reply() {
        let reply = decode_reply(500, false, r#"{"error": "model down", "error_code": "E000"}"#)
            .unwrap();
        assert_eq!(reply.error.as_deref(), Some("model down"));
    }

    #[test]
    fn test_plain_failure_is_status_error() {
        let err = decode_reply(502, false, "Bad Gateway").unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 502, .. }));

        let err = decode_reply(500, false, "{}").unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 500, .. }));
    }

    #[test]
    fn test_success_with_garbage_is_decode_error() {
        let err = decode_reply(200, true, "<html>").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let api = HttpDashboardApi::new("http://localhost:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:5000");
    }
}
