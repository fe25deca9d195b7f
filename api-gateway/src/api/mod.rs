//! API handlers
//!
//! This module contains all the API endpoint handlers organized by resource.
//! Each handler follows a consistent pattern:
//! - Extract state and parameters using Axum extractors
//! - Record the request in the statistics counters
//! - Call the appropriate service methods
//! - Map the result to a standardized response format

pub mod account;
pub mod response;
pub mod stats;

// Re-export the response module for easy access
pub use response::ApiResponse;
