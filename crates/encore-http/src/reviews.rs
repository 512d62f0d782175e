//! Review endpoints.

use async_trait::async_trait;
use tracing::instrument;

use encore_core::models::{CreateReviewRequest, Review, UpdateReviewRequest};
use encore_core::{PerformanceId, Result, ReviewApi, ReviewId};

use crate::endpoints::{self, MY_REVIEWS, REVIEWS};
use crate::gateway::{ApiGateway, ApiRequest};

#[async_trait]
impl ReviewApi for ApiGateway {
    #[instrument(skip(self, request), fields(performance_id = request.performance_id))]
    async fn create_review(&self, request: &CreateReviewRequest) -> Result<Review> {
        self.call(ApiRequest::post(REVIEWS, request)).await
    }

    #[instrument(skip(self))]
    async fn reviews_for_performance(
        &self,
        performance_id: PerformanceId,
    ) -> Result<Vec<Review>> {
        let path = endpoints::reviews_for_performance(performance_id);
        self.call(ApiRequest::get(&path)).await
    }

    #[instrument(skip(self))]
    async fn my_reviews(&self) -> Result<Vec<Review>> {
        self.call(ApiRequest::get(MY_REVIEWS)).await
    }

    #[instrument(skip(self, request))]
    async fn update_review(&self, id: ReviewId, request: &UpdateReviewRequest) -> Result<Review> {
        let path = endpoints::review(id);
        self.call(ApiRequest::put(&path, request)).await
    }

    #[instrument(skip(self))]
    async fn delete_review(&self, id: ReviewId) -> Result<()> {
        let path = endpoints::review(id);
        self.call_no_content(ApiRequest::delete(&path)).await
    }
}
