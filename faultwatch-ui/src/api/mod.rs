//! API Client Module
//!
//! HTTP calls to the Faultwatch server.

pub mod client;

pub use client::*;
