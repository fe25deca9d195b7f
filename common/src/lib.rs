//! Common types and utilities for the balance engine
//!
//! This library contains the shared types used across the balance engine
//! services. It provides a unified approach to error handling and the
//! account domain model.

pub mod error;
pub mod model;

/// Re-export important types
pub use error::{Error, Result, ErrorExt};
pub use model::account::{Account, AccountId, Amount};

// Re-export utoipa for use in model ToSchema derives
#[cfg(feature = "utoipa")]
pub use utoipa;
