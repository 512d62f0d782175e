use serde::{Deserialize, Serialize};

use crate::credentials::Credentials;
use crate::tokens::AccessToken;

use super::User;

/// Account role chosen at sign-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Performer,
}

/// Request body for `POST /api/auth/signup`.
#[derive(Debug, Clone, Serialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

/// Request body for `POST /api/auth/signin`.
#[derive(Clone, Serialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

impl From<&Credentials> for SignInRequest {
    fn from(credentials: &Credentials) -> Self {
        Self {
            email: credentials.email().to_string(),
            password: credentials.password().to_string(),
        }
    }
}

impl std::fmt::Debug for SignInRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Request body for `POST /api/email/send-verification`.
#[derive(Debug, Clone, Serialize)]
pub struct SendVerificationRequest {
    pub email: String,
}

/// Request body for `POST /api/email/verify`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailVerificationRequest {
    pub email: String,
    pub verification_code: String,
}

/// Result of a successful sign-up, sign-in or token refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: AccessToken,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: User,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}
