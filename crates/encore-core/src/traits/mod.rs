//! Domain query traits, one per resource family.
//!
//! Implementations map each call onto one HTTP request; they do not
//! validate, retry or cache.

mod auth;
mod performances;
mod reviews;
mod users;

pub use auth::AuthApi;
pub use performances::PerformanceApi;
pub use reviews::ReviewApi;
pub use users::UserApi;
