//! Request and response hooks that tie HTTP traffic to the session.
//!
//! The outgoing hook decides whether a request may be sent and with which
//! token; the incoming hook turns authentication failures into a cleared
//! session and a trip to the login screen. Both run for every request made
//! through the [`ApiGateway`](crate::ApiGateway).

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use encore_core::error::{ApiError, AuthError, Error};
use encore_core::{AccessToken, Navigator, Result, SessionStore, TokenStatus};

use crate::config::GatewayConfig;

/// Session-aware middleware for the gateway.
#[derive(Debug)]
pub struct AuthInterceptor {
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    config: GatewayConfig,
    // Serializes the "already on login?" check with the navigation itself.
    redirect: Mutex<()>,
}

impl AuthInterceptor {
    pub fn new(
        config: &GatewayConfig,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            session,
            navigator,
            config: config.clone(),
            redirect: Mutex::new(()),
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Outgoing hook.
    ///
    /// Returns the token to attach, `None` for an anonymous request, or an
    /// error when the stored token is unusable. In that case the session has
    /// been cleared and the request must not be sent. Tokens are judged by
    /// the session's own inspector.
    pub fn before_send(&self, path: &str) -> Result<Option<AccessToken>> {
        let Some(token) = self.session.token() else {
            debug!(path, "No token, sending anonymously");
            return Ok(None);
        };

        match self.session.inspector().inspect(token.as_str()) {
            TokenStatus::Valid { .. } => Ok(Some(token)),
            TokenStatus::Expired { expired_at } => {
                warn!(path, expired_at, "Access token expired, request aborted");
                self.end_session(Some(&token));
                Err(AuthError::SessionExpired.into())
            }
            TokenStatus::Malformed => {
                warn!(path, "Access token unreadable, request aborted");
                self.end_session(Some(&token));
                Err(AuthError::MalformedToken.into())
            }
        }
    }

    /// Incoming hook for a failed response to a request sent with `sent`.
    ///
    /// Authentication failures outside the excluded paths clear the session
    /// and redirect to login, unless the session has moved on to another
    /// token since the request left. The error is always handed back so the
    /// caller can still show a message.
    pub fn on_failure(&self, error: ApiError, sent: Option<&AccessToken>) -> Error {
        if !self.config.is_auth_failure(error.status) {
            return Error::Api(error);
        }

        if self.config.is_excluded(&error.path) {
            debug!(
                status = error.status,
                path = %error.path,
                "Authentication failure on excluded endpoint, session kept"
            );
            return Error::Api(error);
        }

        if !self.end_session(sent) {
            info!(
                status = error.status,
                path = %error.path,
                "Rejected token was already replaced, session kept"
            );
            return Error::Api(error);
        }

        warn!(
            status = error.status,
            path = %error.path,
            "Authentication failed, session ended"
        );
        Error::Auth(AuthError::Rejected(error))
    }

    /// End the session that was holding `token` and move to the login screen
    /// unless already there.
    ///
    /// Returns false, without navigating, if the session no longer holds
    /// `token`.
    pub fn end_session(&self, token: Option<&AccessToken>) -> bool {
        if !self.session.logout_if_token(token) {
            return false;
        }
        self.redirect_to_login();
        true
    }

    fn redirect_to_login(&self) {
        let _guard = self.redirect.lock().unwrap_or_else(PoisonError::into_inner);
        let login_path = &self.config.login_path;
        if self.navigator.current_path() == *login_path {
            debug!("Already on login page, redirect suppressed");
            return;
        }
        info!(to = %login_path, "Redirecting to login");
        self.navigator.navigate(login_path);
    }
}
