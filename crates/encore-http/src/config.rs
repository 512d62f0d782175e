//! Gateway configuration.

use encore_core::ApiUrl;
use encore_core::navigation::LOGIN_PATH;

/// Statuses that end the session by default.
pub const DEFAULT_AUTH_FAILURE_STATUSES: [u16; 2] = [401, 403];

/// Path fragments whose failures never end the session: sign-in, sign-up and
/// email verification are allowed to fail.
pub const DEFAULT_EXCLUDED_PATHS: [&str; 2] = ["/api/email/", "/api/auth/"];

/// How the gateway talks to the API and reacts to authentication failures.
///
/// Token expiry policy is not part of this: the gateway checks tokens with
/// the session store's own [`TokenInspector`](encore_core::TokenInspector).
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: ApiUrl,
    pub auth_failure_statuses: Vec<u16>,
    pub excluded_paths: Vec<String>,
    pub login_path: String,
}

impl GatewayConfig {
    pub fn new(base_url: ApiUrl) -> Self {
        Self {
            base_url,
            auth_failure_statuses: DEFAULT_AUTH_FAILURE_STATUSES.to_vec(),
            excluded_paths: DEFAULT_EXCLUDED_PATHS.iter().map(|p| p.to_string()).collect(),
            login_path: LOGIN_PATH.to_string(),
        }
    }

    /// Replace the statuses treated as authentication failures.
    pub fn with_auth_failure_statuses(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.auth_failure_statuses = statuses.into_iter().collect();
        self
    }

    /// Add a path fragment whose failures never end the session.
    pub fn with_excluded_path(mut self, fragment: impl Into<String>) -> Self {
        self.excluded_paths.push(fragment.into());
        self
    }

    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn is_auth_failure(&self, status: u16) -> bool {
        self.auth_failure_statuses.contains(&status)
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.excluded_paths
            .iter()
            .any(|fragment| path.contains(fragment.as_str()))
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(ApiUrl::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_treat_only_401_and_403_as_auth_failures() {
        let config = GatewayConfig::default();
        assert!(config.is_auth_failure(401));
        assert!(config.is_auth_failure(403));
        assert!(!config.is_auth_failure(500));
        assert_eq!(config.login_path, "/auth/login");
        assert_eq!(config.base_url.to_string(), "http://localhost:8080");
    }

    #[test]
    fn server_errors_can_be_opted_in() {
        let config = GatewayConfig::default().with_auth_failure_statuses([401, 403, 500]);
        assert!(config.is_auth_failure(500));
    }

    #[test]
    fn auth_and_email_paths_are_excluded() {
        let config = GatewayConfig::default();
        assert!(config.is_excluded("/api/auth/signin"));
        assert!(config.is_excluded("/api/email/verify"));
        assert!(!config.is_excluded("/api/performances"));
        assert!(!config.is_excluded("/api/users/profile"));
    }

    #[test]
    fn extra_excluded_fragments_keep_the_defaults() {
        let config = GatewayConfig::default().with_excluded_path("/api/public/");
        assert!(config.is_excluded("/api/public/performances"));
        assert!(config.is_excluded("/api/auth/signup"));
        assert!(!config.is_excluded("/api/reviews/my"));
    }

    #[test]
    fn login_path_can_be_moved() {
        let config = GatewayConfig::default().with_login_path("/signin");
        assert_eq!(config.login_path, "/signin");
    }
}
