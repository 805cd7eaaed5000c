//! Native Dashboard Client
//!
//! Drives a [`Dashboard`] against a prediction server. The dashboard is only
//! locked between awaits, so submissions may overlap; the latest one wins
//! and earlier replies come back as [`SubmitFailure::Superseded`].
//!
//! # Example
//!
//! ```rust,ignore
//! use faultwatch::client::{DashboardClient, HttpDashboardApi};
//! use faultwatch_core::dashboard::FormState;
//! use faultwatch_core::sensor::{SafeRanges, SensorKey};
//! use std::time::Duration;
//!
//! let api = HttpDashboardApi::new("http://localhost:5000", Duration::from_secs(5))?;
//! let client = DashboardClient::new(api, SafeRanges::default());
//! client.init().await;
//!
//! let mut form = FormState::new();
//! for key in SensorKey::ALL {
//!     form.set(key, "50");
//! }
//! let result = client.submit(form).await?;
//! println!("{} {}", result.error_code, result.error_description);
//! ```

mod http;

pub use http::{ClientError, DashboardApi, HttpDashboardApi};

use faultwatch_core::dashboard::{Dashboard, FormState, PredictionOutcome, SubmitError};
use faultwatch_core::sensor::SafeRanges;
use faultwatch_core::wire::PredictionResult;
use thiserror::Error;
use tokio::sync::Mutex;

/// Why a submission produced no applied prediction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitFailure {
    #[error(transparent)]
    Invalid(#[from] SubmitError),

    #[error("Error: {0}")]
    Rejected(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Superseded by a newer submission")]
    Superseded,
}

pub struct DashboardClient<A> {
    api: A,
    dashboard: Mutex<Dashboard>,
}

impl<A: DashboardApi> DashboardClient<A> {
    pub fn new(api: A, ranges: SafeRanges) -> Self {
        Self {
            api,
            dashboard: Mutex::new(Dashboard::new(ranges)),
        }
    }

    /// Set up the charts and load the initial history
    pub async fn init(&self) {
        self.dashboard.lock().await.init();
        self.refresh_logs().await;
    }

    /// Validate `form`, send it, and apply the reply.
    ///
    /// An applied prediction is followed by a log refresh.
    pub async fn submit(&self, form: FormState) -> Result<PredictionResult, SubmitFailure> {
        let pending = {
            let mut dashboard = self.dashboard.lock().await;
            *dashboard.form_mut() = form;
            dashboard.begin_submit()?
        };

        let outcome = match self.api.predict(&pending.reading).await {
            Ok(reply) => self.dashboard.lock().await.apply_prediction(&pending, reply),
            Err(e) => self.dashboard.lock().await.fail_prediction(&pending, e),
        };

        if let Some(notice) = outcome.notice() {
            tracing::warn!(token = pending.token.value(), "{}", notice);
        }

        if outcome.refresh_logs() {
            self.refresh_logs().await;
        }

        match outcome {
            PredictionOutcome::Applied(result) => Ok(result),
            PredictionOutcome::Rejected(message) => Err(SubmitFailure::Rejected(message)),
            PredictionOutcome::Failed(message) => Err(SubmitFailure::Transport(message)),
            PredictionOutcome::Stale => Err(SubmitFailure::Superseded),
        }
    }

    /// Re-fetch `/logs` into the line chart. Returns whether it was applied.
    pub async fn refresh_logs(&self) -> bool {
        let token = self.dashboard.lock().await.begin_log_refresh();

        match self.api.logs().await {
            Ok(entries) => self.dashboard.lock().await.apply_logs(token, &entries),
            Err(e) => {
                self.dashboard.lock().await.fail_logs(token, e);
                false
            }
        }
    }

    /// Copy of the current dashboard state for rendering
    pub async fn snapshot(&self) -> Dashboard {
        self.dashboard.lock().await.clone()
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}
