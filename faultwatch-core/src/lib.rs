//! # Faultwatch Core
//!
//! Domain types shared by the Faultwatch server, the native dashboard client
//! and the WASM dashboard page.
//!
//! Nothing in this crate performs IO. Drivers issue the HTTP calls and feed
//! the responses back into [`dashboard::Dashboard`].
//!
//! ## Modules
//!
//! - [`sensor`]: The eight sensor channels, safe ranges, and readings
//! - [`fault`]: Fault-code catalogue
//! - [`wire`]: JSON shapes exchanged with `/predict` and `/logs`
//! - [`dashboard`]: Chart renderer, form validator, request sequencing
//!
//! ## Example
//!
//! ```rust
//! use faultwatch_core::dashboard::Dashboard;
//! use faultwatch_core::sensor::{SafeRanges, SensorKey};
//! use faultwatch_core::wire::PredictReply;
//!
//! let mut dashboard = Dashboard::new(SafeRanges::default());
//! dashboard.init();
//!
//! for key in SensorKey::ALL {
//!     dashboard.form_mut().set(key, "50");
//! }
//!
//! let pending = dashboard.begin_submit().expect("form is complete");
//! let reply = PredictReply::success(0.42, "E001", "Over Temperature");
//! let outcome = dashboard.apply_prediction(&pending, reply);
//!
//! assert!(outcome.refresh_logs());
//! assert_eq!(dashboard.charts().donut().center(), "42%");
//! ```

pub mod dashboard;
pub mod fault;
pub mod sensor;
pub mod wire;

pub use dashboard::{
    BarColor, ChartRenderer, Dashboard, FieldStatus, FormState, PendingPrediction,
    PredictionOutcome, RequestToken, SubmitError, Validation,
};
pub use fault::FaultCode;
pub use sensor::{SafeRange, SafeRanges, SensorKey, SensorReading};
pub use wire::{LogEntry, PredictReply, PredictionResult, ReplyError};
