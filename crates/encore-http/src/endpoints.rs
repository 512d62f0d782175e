//! API paths.

use encore_core::types::{PerformanceId, ReviewId, UserId};

pub const SIGN_UP: &str = "/api/auth/signup";
pub const SIGN_IN: &str = "/api/auth/signin";

pub const SEND_VERIFICATION: &str = "/api/email/send-verification";
pub const VERIFY_EMAIL: &str = "/api/email/verify";

pub const PERFORMANCES: &str = "/api/performances";
pub const PERFORMANCE_SEARCH: &str = "/api/performances/search";
pub const PERFORMANCE_CALENDAR: &str = "/api/performances/calendar";
pub const MY_PERFORMANCES: &str = "/api/performances/my";

pub const REVIEWS: &str = "/api/reviews";
pub const MY_REVIEWS: &str = "/api/reviews/my";

pub const PROFILE: &str = "/api/users/profile";
pub const REFRESH_TOKEN: &str = "/api/users/refresh-token";

pub fn performance(id: PerformanceId) -> String {
    format!("{}/{}", PERFORMANCES, id)
}

pub fn review(id: ReviewId) -> String {
    format!("{}/{}", REVIEWS, id)
}

pub fn reviews_for_performance(id: PerformanceId) -> String {
    format!("{}/performance/{}", REVIEWS, id)
}

pub fn user(id: UserId) -> String {
    format!("/api/users/{}", id)
}
