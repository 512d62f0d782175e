//! Error types for the encore client.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, API, input validation and storage errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for encore operations.
///
/// Authentication problems that the request pipeline handles centrally
/// (malformed or expired tokens, rejected sessions) surface as
/// [`Error::Auth`]; every other non-success response is an [`Error::Api`]
/// and reaches the caller untouched.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Session errors handled by the request pipeline.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-success responses from the remote API.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Input validation errors (bad base URL, failed form validation).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Durable storage errors.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// Returns the HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(err) | Error::Auth(AuthError::Rejected(err)) => Some(err.status),
            _ => None,
        }
    }

    /// Returns true if this error ended the current session.
    pub fn ended_session(&self) -> bool {
        matches!(
            self,
            Error::Auth(
                AuthError::SessionExpired | AuthError::MalformedToken | AuthError::Rejected(_)
            )
        )
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Response body could not be decoded.
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Session errors raised or handled by the request pipeline.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The stored token is past its expiry; the request was not sent.
    #[error("session expired")]
    SessionExpired,

    /// The stored token could not be decoded; the request was not sent.
    #[error("malformed access token")]
    MalformedToken,

    /// The server rejected the session; it has been cleared.
    #[error("session rejected by server: {0}")]
    Rejected(ApiError),

    /// The operation needs a signed-in user and there is none.
    #[error("not signed in")]
    NotAuthenticated,
}

/// A non-success response from the remote API.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Short error code or reason phrase from the server (if present).
    pub error: Option<String>,
    /// Human-readable message from the server.
    pub message: Option<String>,
    /// Request path that failed.
    pub path: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} on {}", self.status, self.path)?;
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new API error.
    pub fn new(
        status: u16,
        path: impl Into<String>,
        error: Option<String>,
        message: Option<String>,
    ) -> Self {
        Self {
            status,
            error,
            message,
            path: path.into(),
        }
    }

    /// Returns the server message, falling back to the provided text.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// One or more form fields failed client-side validation.
    #[error("validation failed: {}", format_violations(.0))]
    Validation(Vec<FieldViolation>),

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// A single failed form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Field name as it appears in the request body.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Durable storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing store failed.
    #[error("I/O error on '{key}': {message}")]
    Io { key: String, message: String },

    /// A stored snapshot could not be parsed.
    #[error("corrupted snapshot '{key}': {message}")]
    Corrupted { key: String, message: String },
}
