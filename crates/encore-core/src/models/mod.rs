//! Domain records exchanged with the remote API.
//!
//! Field names follow the API's camelCase JSON.

mod auth;
mod performance;
mod review;
mod user;

pub use auth::{
    AuthResponse, EmailVerificationRequest, Role, SendVerificationRequest, SignInRequest,
    SignUpRequest,
};
pub use performance::{
    CalendarEvent, CreatePerformanceRequest, Performance, PerformanceStatus, SearchFilters,
    UpdatePerformanceRequest,
};
pub use review::{CreateReviewRequest, Review, UpdateReviewRequest};
pub use user::{UpdateProfileRequest, User};
