//! Review trait.

use async_trait::async_trait;

use crate::Result;
use crate::models::{CreateReviewRequest, Review, UpdateReviewRequest};
use crate::types::{PerformanceId, ReviewId};

#[async_trait]
pub trait ReviewApi: Send + Sync {
    async fn create_review(&self, request: &CreateReviewRequest) -> Result<Review>;

    async fn reviews_for_performance(&self, performance_id: PerformanceId)
    -> Result<Vec<Review>>;

    /// Reviews written by the signed-in user.
    async fn my_reviews(&self) -> Result<Vec<Review>>;

    async fn update_review(&self, id: ReviewId, request: &UpdateReviewRequest) -> Result<Review>;

    async fn delete_review(&self, id: ReviewId) -> Result<()>;
}
