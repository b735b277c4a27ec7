//! # Domain Layer
//!
//! Pure types describing corridors, quotes and batch outcomes. Nothing in
//! this layer performs I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use errors::{DomainError, DomainResult};
