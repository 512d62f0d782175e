//! Performance endpoints.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::instrument;

use encore_core::models::{
    CreatePerformanceRequest, Performance, SearchFilters, UpdatePerformanceRequest,
};
use encore_core::{PerformanceApi, PerformanceId, Result};

use crate::endpoints::{
    self, MY_PERFORMANCES, PERFORMANCE_CALENDAR, PERFORMANCE_SEARCH, PERFORMANCES,
};
use crate::gateway::{ApiGateway, ApiRequest};

#[async_trait]
impl PerformanceApi for ApiGateway {
    #[instrument(skip(self))]
    async fn list_performances(&self) -> Result<Vec<Performance>> {
        self.call(ApiRequest::get(PERFORMANCES)).await
    }

    #[instrument(skip(self))]
    async fn search_performances(&self, filters: &SearchFilters) -> Result<Vec<Performance>> {
        let query = filters.to_query();
        self.call(ApiRequest::get(PERFORMANCE_SEARCH).with_query(&query))
            .await
    }

    #[instrument(skip(self))]
    async fn performances_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Performance>> {
        let query = [
            ("startDate", start.format("%Y-%m-%d").to_string()),
            ("endDate", end.format("%Y-%m-%d").to_string()),
        ];
        self.call(ApiRequest::get(PERFORMANCE_CALENDAR).with_query(&query))
            .await
    }

    #[instrument(skip(self))]
    async fn my_performances(&self) -> Result<Vec<Performance>> {
        self.call(ApiRequest::get(MY_PERFORMANCES)).await
    }

    #[instrument(skip(self, request), fields(title = %request.title))]
    async fn create_performance(
        &self,
        request: &CreatePerformanceRequest,
    ) -> Result<Performance> {
        self.call(ApiRequest::post(PERFORMANCES, request)).await
    }

    #[instrument(skip(self, request))]
    async fn update_performance(
        &self,
        id: PerformanceId,
        request: &UpdatePerformanceRequest,
    ) -> Result<Performance> {
        let path = endpoints::performance(id);
        self.call(ApiRequest::put(&path, request)).await
    }

    #[instrument(skip(self))]
    async fn delete_performance(&self, id: PerformanceId) -> Result<()> {
        let path = endpoints::performance(id);
        self.call_no_content(ApiRequest::delete(&path)).await
    }
}
