//! encore-core - Session, token and domain types for the encore client.
//!
//! The request pipeline in `encore-http` and every front-end share the types
//! defined here: the [`SessionStore`], the token [`inspector`], the
//! [`Navigator`] capability and the domain query traits.

pub mod catalog;
pub mod credentials;
pub mod error;
pub mod inspector;
pub mod models;
pub mod navigation;
pub mod session;
pub mod storage;
pub mod tokens;
pub mod traits;
pub mod types;
pub mod validation;

pub use catalog::PerformanceCatalog;
pub use credentials::Credentials;
pub use error::Error;
pub use inspector::{MissingExpiry, TokenInspector, TokenStatus};
pub use navigation::{LOGIN_PATH, MemoryNavigator, Navigator};
pub use session::{SessionSnapshot, SessionStatus, SessionStore};
pub use storage::{AUTH_STORAGE_KEY, MemoryStorage, SnapshotStorage};
pub use tokens::AccessToken;
pub use traits::{AuthApi, PerformanceApi, ReviewApi, UserApi};
pub use types::{ApiUrl, PerformanceId, ReviewId, UserId};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
