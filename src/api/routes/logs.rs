//! Logs Route
//!
//! - GET /logs - Recent predictions, oldest first

use axum::{extract::State, Json};
use faultwatch_core::wire::LogEntry;
use std::sync::Arc;

use crate::api::state::AppState;

/// GET /logs
pub async fn list_logs(State(state): State<Arc<AppState>>) -> Json<Vec<LogEntry>> {
    Json(state.history.snapshot().await)
}
