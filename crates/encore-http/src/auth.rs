//! Account and email verification endpoints.

use async_trait::async_trait;
use tracing::{info, instrument};

use encore_core::models::{
    AuthResponse, EmailVerificationRequest, SendVerificationRequest, SignInRequest, SignUpRequest,
};
use encore_core::{AuthApi, Result};

use crate::endpoints::{SEND_VERIFICATION, SIGN_IN, SIGN_UP, VERIFY_EMAIL};
use crate::gateway::{ApiGateway, ApiRequest};

#[async_trait]
impl AuthApi for ApiGateway {
    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResponse> {
        info!("Signing up");
        self.call(ApiRequest::post(SIGN_UP, request)).await
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn sign_in(&self, request: &SignInRequest) -> Result<AuthResponse> {
        info!("Signing in");
        self.call(ApiRequest::post(SIGN_IN, request)).await
    }

    #[instrument(skip(self))]
    async fn send_verification_email(&self, email: &str) -> Result<()> {
        let request = SendVerificationRequest {
            email: email.to_string(),
        };
        self.call_no_content(ApiRequest::post(SEND_VERIFICATION, &request))
            .await
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn verify_email(&self, request: &EmailVerificationRequest) -> Result<()> {
        self.call_no_content(ApiRequest::post(VERIFY_EMAIL, request))
            .await
    }
}
