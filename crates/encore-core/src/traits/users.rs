//! User profile trait.

use async_trait::async_trait;

use crate::Result;
use crate::models::{AuthResponse, UpdateProfileRequest, User};
use crate::types::UserId;

#[async_trait]
pub trait UserApi: Send + Sync {
    /// Profile of the signed-in user.
    async fn profile(&self) -> Result<User>;

    async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<User>;

    /// Public profile of any user.
    async fn user(&self, id: UserId) -> Result<User>;

    /// Issue a fresh access token for the signed-in user.
    ///
    /// Nothing calls this automatically; storing the result is up to the
    /// caller.
    async fn refresh_token(&self) -> Result<AuthResponse>;
}
