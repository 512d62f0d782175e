//! Session wiring for the CLI.

mod navigator;
pub mod storage;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use encore_core::error::{AuthError, Error};
use encore_core::models::User;
use encore_core::{ApiUrl, SessionStore};
use encore_http::{ApiGateway, GatewayConfig};

pub use navigator::TerminalNavigator;

/// Everything a command needs: the restored session and a gateway bound to it.
#[derive(Debug)]
pub struct CliContext {
    pub session: Arc<SessionStore>,
    pub gateway: ApiGateway,
}

impl CliContext {
    /// Restore the session from disk and build the gateway.
    pub fn open(api_url: &str, data_dir: Option<&Path>) -> Result<Self> {
        let api_url = ApiUrl::new(api_url).context("Invalid API URL")?;
        let data_dir = storage::data_dir(data_dir)?;
        let session = storage::open_session(&data_dir);

        let gateway = ApiGateway::new(
            GatewayConfig::new(api_url),
            session.clone(),
            Arc::new(TerminalNavigator::new()),
        )
        .context("Failed to create API client")?;

        Ok(Self { session, gateway })
    }

    /// The signed-in user, or an error when there is no session with a
    /// usable token.
    ///
    /// An expired token is cleared from disk before the error is returned.
    pub fn require_session(&self) -> Result<User> {
        self.session.require_user().map_err(|e| {
            let hint = match e {
                Error::Auth(AuthError::NotAuthenticated) => {
                    "Not signed in. Run 'encore auth signin' first."
                }
                _ => "Session expired. Run 'encore auth signin' to sign in again.",
            };
            anyhow::Error::new(e).context(hint)
        })
    }
}
