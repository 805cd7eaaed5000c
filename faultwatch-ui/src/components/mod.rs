//! UI Components
//!
//! Leptos components for the dashboard.

pub mod charts;
pub mod fault_status;
pub mod sensor_form;
pub mod toast;

pub use charts::{BarChart, DonutChart, LineChart};
pub use fault_status::FaultStatus;
pub use sensor_form::SensorForm;
pub use toast::Toast;
