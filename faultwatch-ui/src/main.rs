//! Faultwatch Dashboard
//!
//! Fault-risk dashboard for the filling line, built with Leptos (WASM).
//!
//! # Features
//!
//! - Risk donut, per-sensor range bars and a history line
//! - Sensor form with per-field validation
//! - Late replies to superseded submissions are ignored
//!
//! # Architecture
//!
//! A client-side rendered (CSR) Leptos application compiled to WebAssembly.
//! All dashboard state lives in one `faultwatch_core::Dashboard` held in a
//! signal; this crate only performs the HTTP calls and draws the canvases.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
