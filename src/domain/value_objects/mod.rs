//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`ProviderId`]: String-based provider identifier
//!
//! ## Corridor Types
//!
//! - [`CountryCode`], [`CurrencyCode`]: Normalized ISO codes
//! - [`Corridor`]: Source/destination route
//! - [`SendAmount`]: Positive decimal amount
//!
//! ## Domain Enums
//!
//! - [`SortPolicy`]: Named ranking policies
//! - [`FailureKind`]: Classification of failed provider outcomes

pub mod amount;
pub mod corridor;
pub mod enums;
pub mod ids;
pub mod timestamp;

pub use amount::SendAmount;
pub use corridor::{Corridor, CountryCode, CurrencyCode};
pub use enums::{FailureKind, SortPolicy};
pub use ids::ProviderId;
pub use timestamp::Timestamp;
