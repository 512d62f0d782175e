//! Core value types.
//!
//! These types enforce their invariants at construction time.

mod api_url;

pub use api_url::{ApiUrl, DEFAULT_API_URL};

/// Server-assigned user identifier.
pub type UserId = i64;

/// Server-assigned performance identifier.
pub type PerformanceId = i64;

/// Server-assigned review identifier.
pub type ReviewId = i64;
