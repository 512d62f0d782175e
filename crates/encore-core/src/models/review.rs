use serde::{Deserialize, Serialize};

use crate::types::{PerformanceId, ReviewId, UserId};

use super::User;

/// A review left on a performance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub content: String,
    pub rating: u8,
    pub performance_id: PerformanceId,
    pub user_id: UserId,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Request body for `POST /api/reviews`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub content: String,
    pub rating: u8,
    pub performance_id: PerformanceId,
}

/// Request body for `PUT /api/reviews/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateReviewRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}
