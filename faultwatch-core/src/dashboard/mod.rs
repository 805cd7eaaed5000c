//! Dashboard Client
//!
//! The whole client-side state of the fault dashboard, held in one value and
//! passed by reference to whoever needs to redraw.
//!
//! ## Flow
//!
//! 1. `init()` sets up the charts, then the driver calls `begin_log_refresh()`
//! 2. On submit, `begin_submit()` validates the form and hands out a
//!    [`PendingPrediction`]; nothing is sent when validation fails
//! 3. The driver POSTs the reading and passes the reply to
//!    `apply_prediction()` (or the transport error to `fail_prediction()`)
//! 4. An applied prediction asks for a log refresh
//!
//! Responses are matched against request tokens, so a late answer to an
//! older submission never overwrites a newer one.

mod charts;
mod form;
mod requestor;

pub use charts::{Bar, BarChart, BarColor, ChartRenderer, DonutChart, LineChart};
pub use form::{validate, FieldStatus, FormState, Validation};
pub use requestor::{RequestPhase, RequestToken, TokenSequence};

use thiserror::Error;

use crate::sensor::{SafeRanges, SensorKey, SensorReading};
use crate::wire::{probability_percent, LogEntry, PredictReply, PredictionResult, ReplyError};

/// Submission blocked before any request was made
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error("Please fill in every sensor field with a number ({})", field_list(.0))]
    Invalid(Vec<SensorKey>),
}

fn field_list(keys: &[SensorKey]) -> String {
    keys.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
}

/// A validated submission waiting for its `/predict` reply
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPrediction {
    pub token: RequestToken,
    pub reading: SensorReading,
}

/// What happened when a `/predict` reply (or failure) came back
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    /// Charts and fault status updated
    Applied(PredictionResult),
    /// The server reported an error; charts untouched
    Rejected(String),
    /// Transport or decode failure; charts untouched
    Failed(String),
    /// A newer submission was issued; reply discarded
    Stale,
}

impl PredictionOutcome {
    /// Message to show the user, if any
    pub fn notice(&self) -> Option<String> {
        match self {
            PredictionOutcome::Applied(_) | PredictionOutcome::Stale => None,
            PredictionOutcome::Rejected(message) => Some(format!("Error: {}", message)),
            PredictionOutcome::Failed(message) => Some(format!("Request failed: {}", message)),
        }
    }

    /// Whether the driver should now re-fetch `/logs`
    pub fn refresh_logs(&self) -> bool {
        matches!(self, PredictionOutcome::Applied(_))
    }
}

/// Code and description shown next to the donut, verbatim from the server
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultStatus {
    pub error_code: String,
    pub error_description: String,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    charts: ChartRenderer,
    form: FormState,
    validation: Option<Validation>,
    fault: FaultStatus,
    predictions: TokenSequence,
    log_polls: TokenSequence,
}

impl Dashboard {
    pub fn new(ranges: SafeRanges) -> Self {
        Self {
            charts: ChartRenderer::new(ranges),
            form: FormState::new(),
            validation: None,
            fault: FaultStatus::default(),
            predictions: TokenSequence::new(),
            log_polls: TokenSequence::new(),
        }
    }

    /// Set up the charts; safe to call more than once
    pub fn init(&mut self) {
        self.charts.init_charts();
    }

    pub fn charts(&self) -> &ChartRenderer {
        &self.charts
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    /// Field marks from the most recent submit attempt
    pub fn validation(&self) -> Option<&Validation> {
        self.validation.as_ref()
    }

    pub fn fault(&self) -> &FaultStatus {
        &self.fault
    }

    pub fn phase(&self) -> RequestPhase {
        if self.predictions.in_flight() > 0 {
            RequestPhase::Requesting
        } else {
            RequestPhase::Idle
        }
    }

    /// Validate the form and, if it passes, issue a prediction token
    pub fn begin_submit(&mut self) -> Result<PendingPrediction, SubmitError> {
        let validation = validate(&self.form);
        let reading = validation.reading();
        let flagged = validation.flagged();
        self.validation = Some(validation);

        match reading {
            Some(reading) => {
                let token = self.predictions.issue();
                tracing::debug!(token = token.value(), "Prediction requested");
                Ok(PendingPrediction { token, reading })
            }
            None => {
                tracing::debug!(fields = %field_list(&flagged), "Submission blocked by validation");
                Err(SubmitError::Invalid(flagged))
            }
        }
    }

    /// Apply a decoded `/predict` body
    pub fn apply_prediction(
        &mut self,
        pending: &PendingPrediction,
        reply: PredictReply,
    ) -> PredictionOutcome {
        if !self.predictions.settle(pending.token) {
            tracing::debug!(token = pending.token.value(), "Discarding stale prediction");
            return PredictionOutcome::Stale;
        }

        match reply.into_result() {
            Ok(result) => {
                self.charts.update_donut(probability_percent(result.probability));
                self.fault = FaultStatus {
                    error_code: result.error_code.clone(),
                    error_description: result.error_description.clone(),
                };
                self.charts.update_bar(&pending.reading);
                PredictionOutcome::Applied(result)
            }
            Err(ReplyError::Server(message)) => PredictionOutcome::Rejected(message),
            Err(e @ ReplyError::Malformed(_)) => PredictionOutcome::Failed(e.to_string()),
        }
    }

    /// Record that the `/predict` call itself failed
    pub fn fail_prediction(
        &mut self,
        pending: &PendingPrediction,
        error: impl std::fmt::Display,
    ) -> PredictionOutcome {
        if !self.predictions.settle(pending.token) {
            tracing::debug!(token = pending.token.value(), "Discarding stale prediction failure");
            return PredictionOutcome::Stale;
        }
        PredictionOutcome::Failed(error.to_string())
    }

    /// Issue a token for a `/logs` fetch
    pub fn begin_log_refresh(&mut self) -> RequestToken {
        self.log_polls.issue()
    }

    /// Replace the line series. Returns false when a newer fetch was issued.
    pub fn apply_logs(&mut self, token: RequestToken, entries: &[LogEntry]) -> bool {
        if !self.log_polls.settle(token) {
            tracing::debug!(token = token.value(), "Discarding stale log fetch");
            return false;
        }
        self.charts.update_line(entries);
        true
    }

    /// Log fetch failures only reach the diagnostic log
    pub fn fail_logs(&mut self, token: RequestToken, error: impl std::fmt::Display) {
        self.log_polls.settle(token);
        tracing::warn!(error = %error, "Failed to load prediction logs");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashboard_with(value: &str) -> Dashboard {
        let mut dashboard = Dashboard::new(SafeRanges::default());
        dashboard.init();
        for key in SensorKey::ALL {
            dashboard.form_mut().set(key, value);
        }
        dashboard
    }

    #[test]
    fn test_successful_prediction_updates_charts() {
        let mut dashboard = dashboard_with("50");
        let pending = dashboard.begin_submit().unwrap();
        assert_eq!(dashboard.phase(), RequestPhase::Requesting);

        let outcome = dashboard.apply_prediction(
            &pending,
            PredictReply::success(0.42, "E001", "Over Temperature"),
        );

        assert!(outcome.refresh_logs());
        assert_eq!(outcome.notice(), None);
        assert_eq!(dashboard.phase(), RequestPhase::Idle);
        assert_eq!(dashboard.charts().donut().slices(), [58, 42]);
        assert_eq!(dashboard.charts().donut().center(), "42%");
        assert_eq!(dashboard.fault().error_code, "E001");
        assert_eq!(dashboard.fault().error_description, "Over Temperature");
        assert_eq!(dashboard.charts().bar().bar(SensorKey::Temp).value, Some(50.0));
        assert_eq!(dashboard.charts().bar().bar(SensorKey::Temp).color, BarColor::Green);
        assert_eq!(dashboard.charts().bar().bar(SensorKey::Pressure).color, BarColor::Red);
    }

    #[test]
    fn test_invalid_form_issues_no_token() {
        let mut dashboard = dashboard_with("1");
        dashboard.form_mut().set(SensorKey::Flow, "");

        let err = dashboard.begin_submit().unwrap_err();

        assert_eq!(err, SubmitError::Invalid(vec![SensorKey::Flow]));
        assert_eq!(dashboard.phase(), RequestPhase::Idle);
        assert_eq!(
            dashboard.validation().unwrap().empty_fields(),
            vec![SensorKey::Flow]
        );
    }

    #[test]
    fn test_server_error_leaves_charts_unchanged() {
        let mut dashboard = dashboard_with("50");
        let first = dashboard.begin_submit().unwrap();
        dashboard.apply_prediction(&first, PredictReply::success(0.3, "E000", "ok"));
        let token = dashboard.begin_log_refresh();
        dashboard.apply_logs(token, &[LogEntry::new("t1", 0.3)]);

        let before = dashboard.charts().clone();
        let fault_before = dashboard.fault().clone();

        dashboard.form_mut().set(SensorKey::Temp, "999");
        let second = dashboard.begin_submit().unwrap();
        let outcome =
            dashboard.apply_prediction(&second, PredictReply::failure("model unavailable"));

        assert_eq!(outcome, PredictionOutcome::Rejected("model unavailable".to_string()));
        assert!(!outcome.refresh_logs());
        assert_eq!(outcome.notice().unwrap(), "Error: model unavailable");
        assert_eq!(dashboard.charts().donut(), before.donut());
        assert_eq!(dashboard.charts().bar(), before.bar());
        assert_eq!(dashboard.charts().line(), before.line());
        assert_eq!(dashboard.fault(), &fault_before);
    }

    #[test]
    fn test_transport_failure_is_reported() {
        let mut dashboard = dashboard_with("50");
        let pending = dashboard.begin_submit().unwrap();

        let outcome = dashboard.fail_prediction(&pending, "connection refused");

        assert_eq!(outcome, PredictionOutcome::Failed("connection refused".to_string()));
        assert_eq!(dashboard.charts().donut().percent(), 0);
    }

    #[test]
    fn test_out_of_order_replies_keep_latest() {
        let mut dashboard = dashboard_with("50");
        let first = dashboard.begin_submit().unwrap();
        dashboard.form_mut().set(SensorKey::Temp, "90");
        let second = dashboard.begin_submit().unwrap();

        let newer = dashboard.apply_prediction(&second, PredictReply::success(0.9, "E001", "hot"));
        let older = dashboard.apply_prediction(&first, PredictReply::success(0.1, "E000", "ok"));

        assert!(matches!(newer, PredictionOutcome::Applied(_)));
        assert_eq!(older, PredictionOutcome::Stale);
        assert_eq!(dashboard.charts().donut().percent(), 90);
        assert_eq!(dashboard.charts().bar().bar(SensorKey::Temp).value, Some(90.0));
        assert_eq!(dashboard.phase(), RequestPhase::Idle);
    }

    #[test]
    fn test_stale_log_fetch_is_discarded() {
        let mut dashboard = dashboard_with("50");
        let old = dashboard.begin_log_refresh();
        let new = dashboard.begin_log_refresh();

        assert!(dashboard.apply_logs(new, &[LogEntry::new("t2", 0.5)]));
        assert!(!dashboard.apply_logs(old, &[LogEntry::new("t1", 0.1)]));
        assert_eq!(dashboard.charts().line().labels(), ["t2"]);
    }

    #[test]
    fn test_log_failure_keeps_previous_series() {
        let mut dashboard = dashboard_with("50");
        let token = dashboard.begin_log_refresh();
        dashboard.apply_logs(token, &[LogEntry::new("t1", 0.1), LogEntry::new("t2", 0.5)]);

        let token = dashboard.begin_log_refresh();
        dashboard.fail_logs(token, "timeout");

        assert_eq!(dashboard.charts().line().data(), [10, 50]);
    }
}
