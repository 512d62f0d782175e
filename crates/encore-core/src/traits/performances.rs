//! Performance listing trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::Result;
use crate::models::{
    CreatePerformanceRequest, Performance, SearchFilters, UpdatePerformanceRequest,
};
use crate::types::PerformanceId;

#[async_trait]
pub trait PerformanceApi: Send + Sync {
    /// All performances.
    async fn list_performances(&self) -> Result<Vec<Performance>>;

    /// Server-side search; blank filters are omitted.
    async fn search_performances(&self, filters: &SearchFilters) -> Result<Vec<Performance>>;

    /// Performances between two dates, inclusive.
    async fn performances_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Performance>>;

    /// Performances listed by the signed-in user.
    async fn my_performances(&self) -> Result<Vec<Performance>>;

    async fn create_performance(&self, request: &CreatePerformanceRequest)
    -> Result<Performance>;

    async fn update_performance(
        &self,
        id: PerformanceId,
        request: &UpdatePerformanceRequest,
    ) -> Result<Performance>;

    async fn delete_performance(&self, id: PerformanceId) -> Result<()>;
}
