//! Global Application State
//!
//! The dashboard model behind a signal, plus toast messages. Network calls
//! are spawned here and their results handed back to the model, which
//! drops replies to superseded requests.

use faultwatch_core::dashboard::{Dashboard, PredictionOutcome, RequestPhase};
use faultwatch_core::sensor::{SafeRanges, SensorKey};
use gloo_timers::callback::Timeout;
use leptos::*;

use crate::api;

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Charts, form, fault status and request sequencing
    pub dashboard: RwSignal<Dashboard>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
    error_timer: StoredValue<ToastTimer>,
    success_timer: StoredValue<ToastTimer>,
}

/// Pending auto-clear of one toast; a new message cancels the old timer
#[derive(Default)]
struct ToastTimer(Option<Timeout>);

impl ToastTimer {
    fn restart(&mut self, millis: u32, on_expire: impl FnOnce() + 'static) {
        if let Some(pending) = self.0.take() {
            pending.cancel();
        }
        self.0 = Some(Timeout::new(millis, on_expire));
    }
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        dashboard: create_rw_signal(Dashboard::new(SafeRanges::default())),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
        error_timer: store_value(ToastTimer::default()),
        success_timer: store_value(ToastTimer::default()),
    };

    provide_context(state);
}

impl GlobalState {
    /// Set up the charts and load the initial history
    pub fn init(&self) {
        self.dashboard.update(|d| d.init());
        self.refresh_logs();
    }

    pub fn set_field(&self, key: SensorKey, text: String) {
        self.dashboard.update(|d| d.form_mut().set(key, text));
    }

    pub fn is_requesting(&self) -> bool {
        self.dashboard.with(|d| d.phase() == RequestPhase::Requesting)
    }

    /// Validate the form and send it to `/predict`
    pub fn submit(&self) {
        let started = self.dashboard.try_update(|d| d.begin_submit());

        let pending = match started {
            Some(Ok(pending)) => pending,
            Some(Err(e)) => {
                self.show_error(&e.to_string());
                return;
            }
            None => return,
        };

        let state = *self;
        spawn_local(async move {
            let reply = api::submit_prediction(&pending.reading).await;

            let outcome = state.dashboard.try_update(|d| match reply {
                Ok(reply) => d.apply_prediction(&pending, reply),
                Err(e) => d.fail_prediction(&pending, e),
            });

            match outcome {
                Some(PredictionOutcome::Applied(result)) => {
                    state.show_success(&format!(
                        "{}: {}",
                        result.error_code, result.error_description
                    ));
                    state.refresh_logs();
                }
                Some(PredictionOutcome::Stale) => {
                    web_sys::console::debug_1(
                        &format!("Discarded reply to request {}", pending.token.value()).into(),
                    );
                }
                Some(other) => {
                    if let Some(notice) = other.notice() {
                        state.show_error(&notice);
                    }
                }
                None => {}
            }
        });
    }

    /// Re-fetch `/logs` into the line chart
    pub fn refresh_logs(&self) {
        let token = self.dashboard.try_update(|d| d.begin_log_refresh());
        let Some(token) = token else { return };

        let state = *self;
        spawn_local(async move {
            match api::fetch_logs().await {
                Ok(entries) => {
                    state.dashboard.update(|d| {
                        d.apply_logs(token, &entries);
                    });
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Failed to load logs: {}", e).into());
                    state.dashboard.update(|d| d.fail_logs(token, e));
                }
            }
        });
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        self.success_timer
            .update_value(|timer| timer.restart(3000, move || success_signal.set(None)));
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        self.error_timer
            .update_value(|timer| timer.restart(5000, move || error_signal.set(None)));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use gloo_timers::future::TimeoutFuture;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn test_restart_cancels_pending_clear() {
        let fired = Rc::new(RefCell::new(Vec::new()));
        let mut timer = ToastTimer::default();

        let first = fired.clone();
        timer.restart(20, move || first.borrow_mut().push("first"));
        let second = fired.clone();
        timer.restart(40, move || second.borrow_mut().push("second"));

        TimeoutFuture::new(80).await;
        assert_eq!(*fired.borrow(), vec!["second"]);
    }
}
