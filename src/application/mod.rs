//! # Application Layer
//!
//! Dispatch, ranking and caching built on the domain types and the
//! infrastructure ports.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult, InfrastructureError};
