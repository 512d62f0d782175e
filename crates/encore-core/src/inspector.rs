//! Offline inspection of bearer token expiry.
//!
//! Tokens are three dot-separated segments; the middle one is a base64
//! encoded JSON object whose `exp` field holds the expiry time in seconds
//! since the Unix epoch. Nothing here verifies signatures: the server stays
//! the authority, this only lets the client skip requests that are bound to
//! be rejected.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use chrono::Utc;
use serde_json::Value;
use thiserror::Error;
use tracing::{trace, warn};

/// How to treat a well-formed token whose payload has no `exp` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingExpiry {
    /// Treat the token as never expiring.
    #[default]
    Trust,
    /// Treat the token as expired.
    Reject,
}

/// Why a token payload could not be read.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenDecodeError {
    #[error("expected 3 segments, found {0}")]
    Segments(usize),

    #[error("payload is not valid base64")]
    Base64,

    #[error("payload is not valid JSON: {0}")]
    Json(String),

    #[error("payload is not a JSON object")]
    NotObject,

    #[error("exp claim is not a number")]
    InvalidExpiry,
}

/// The claims the client cares about.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    /// Expiry, seconds since the Unix epoch.
    pub exp: Option<i64>,
    /// Subject, usually the user's email or id.
    pub sub: Option<String>,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: Option<i64>,
}

/// Result of inspecting a token at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// Usable; `expires_at` is `None` for tokens without an `exp` claim.
    Valid { expires_at: Option<i64> },
    /// Past its `exp`.
    Expired { expired_at: i64 },
    /// Not decodable, or rejected by the [`MissingExpiry`] policy.
    Malformed,
}

impl TokenStatus {
    /// Returns true unless the token is usable.
    pub fn is_expired(&self) -> bool {
        !matches!(self, TokenStatus::Valid { .. })
    }
}

/// Decode the payload segment of a token.
pub fn decode_claims(token: &str) -> Result<Claims, TokenDecodeError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenDecodeError::Segments(segments.len()));
    }

    let payload = segments[1].trim_end_matches('=');
    if payload.is_empty() {
        return Err(TokenDecodeError::Base64);
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .map_err(|_| TokenDecodeError::Base64)?;

    let value: Value =
        serde_json::from_slice(&bytes).map_err(|e| TokenDecodeError::Json(e.to_string()))?;
    let object = value.as_object().ok_or(TokenDecodeError::NotObject)?;

    // A zero expiry is treated as absent, the same as no claim at all.
    let exp = match object.get("exp") {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => Some(
            n.as_i64()
                .or_else(|| n.as_f64().map(|f| f.floor() as i64))
                .ok_or(TokenDecodeError::InvalidExpiry)?,
        ),
        Some(_) => return Err(TokenDecodeError::InvalidExpiry),
    }
    .filter(|&exp| exp != 0);

    Ok(Claims {
        exp,
        sub: object.get("sub").and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }),
        iat: object.get("iat").and_then(Value::as_i64),
    })
}

/// Checks tokens against the current time with a configurable policy for
/// tokens that carry no expiry.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenInspector {
    missing_expiry: MissingExpiry,
}

impl TokenInspector {
    pub fn new(missing_expiry: MissingExpiry) -> Self {
        Self { missing_expiry }
    }

    pub fn missing_expiry(&self) -> MissingExpiry {
        self.missing_expiry
    }

    /// Inspect a token against the current time.
    pub fn inspect(&self, token: &str) -> TokenStatus {
        self.inspect_at(token, Utc::now().timestamp())
    }

    /// Inspect a token against `now` (seconds since the Unix epoch).
    ///
    /// A token expiring exactly at `now` is still valid.
    pub fn inspect_at(&self, token: &str, now: i64) -> TokenStatus {
        let claims = match decode_claims(token) {
            Ok(claims) => claims,
            Err(e) => {
                warn!(error = %e, "Could not decode access token payload");
                return TokenStatus::Malformed;
            }
        };

        match claims.exp {
            Some(exp) if exp < now => {
                trace!(exp, now, "Access token expired");
                TokenStatus::Expired { expired_at: exp }
            }
            Some(exp) => TokenStatus::Valid {
                expires_at: Some(exp),
            },
            None => match self.missing_expiry {
                MissingExpiry::Trust => {
                    warn!("Access token has no exp claim; treating it as non-expiring");
                    TokenStatus::Valid { expires_at: None }
                }
                MissingExpiry::Reject => {
                    warn!("Access token has no exp claim; rejecting it");
                    TokenStatus::Malformed
                }
            },
        }
    }

    /// Returns true if the token is expired or unreadable.
    pub fn is_expired(&self, token: &str) -> bool {
        self.inspect(token).is_expired()
    }
}

/// Returns true if the token is expired or unreadable, trusting tokens
/// without an `exp` claim.
pub fn is_expired(token: &str) -> bool {
    TokenInspector::default().is_expired(token)
}

/// Like [`is_expired`], against an explicit `now` in seconds.
pub fn is_expired_at(token: &str, now: i64) -> bool {
    TokenInspector::default().inspect_at(token, now).is_expired()
}
