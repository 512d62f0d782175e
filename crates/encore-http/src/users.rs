//! User profile endpoints.

use async_trait::async_trait;
use tracing::instrument;

use encore_core::models::{AuthResponse, UpdateProfileRequest, User};
use encore_core::{Result, UserApi, UserId};

use crate::endpoints::{self, PROFILE, REFRESH_TOKEN};
use crate::gateway::{ApiGateway, ApiRequest};

#[async_trait]
impl UserApi for ApiGateway {
    #[instrument(skip(self))]
    async fn profile(&self) -> Result<User> {
        self.call(ApiRequest::get(PROFILE)).await
    }

    #[instrument(skip(self, request))]
    async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<User> {
        self.call(ApiRequest::put(PROFILE, request)).await
    }

    #[instrument(skip(self))]
    async fn user(&self, id: UserId) -> Result<User> {
        let path = endpoints::user(id);
        self.call(ApiRequest::get(&path)).await
    }

    #[instrument(skip(self))]
    async fn refresh_token(&self) -> Result<AuthResponse> {
        self.call(ApiRequest::post_empty(REFRESH_TOKEN)).await
    }
}
