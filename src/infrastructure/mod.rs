//! # Infrastructure Layer
//!
//! Adapters for provider APIs and cache backends, plus tracing setup.

pub mod cache;
pub mod providers;
pub mod telemetry;
