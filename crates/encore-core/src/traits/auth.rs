//! Account and email verification trait.

use async_trait::async_trait;

use crate::Result;
use crate::models::{AuthResponse, EmailVerificationRequest, SignInRequest, SignUpRequest};

/// Sign-up, sign-in and email verification.
///
/// Failures from these endpoints never end the current session: a wrong
/// password or verification code is an ordinary error.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Create an account.
    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResponse>;

    /// Exchange credentials for an access token.
    async fn sign_in(&self, request: &SignInRequest) -> Result<AuthResponse>;

    /// Ask the server to email a verification code.
    async fn send_verification_email(&self, email: &str) -> Result<()>;

    /// Confirm an email address with the code that was sent.
    async fn verify_email(&self, request: &EmailVerificationRequest) -> Result<()>;
}
