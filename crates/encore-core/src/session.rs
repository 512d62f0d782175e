//! Client-side session store.
//!
//! The store owns the signed-in user and their access token, mirrors every
//! change into durable storage, and is restored from that storage once at
//! start-up. It is an ordinary value: share it with `Arc<SessionStore>`
//! between the request pipeline and whatever displays the session.

use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::Result;
use crate::error::{AuthError, StorageError};
use crate::inspector::{TokenInspector, TokenStatus};
use crate::models::{AuthResponse, User};
use crate::storage::{AUTH_STORAGE_KEY, SnapshotStorage};
use crate::tokens::AccessToken;

/// Version written into the persisted envelope.
pub const SNAPSHOT_VERSION: u32 = 0;

/// Coarse lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Not yet restored from durable storage.
    Loading,
    Authenticated,
    Unauthenticated,
}

/// The persisted part of a session: everything except the loading flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub token: Option<AccessToken>,
    #[serde(default)]
    pub is_authenticated: bool,
}

/// On-disk envelope: `{ "state": {...}, "version": 0 }`.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedEnvelope {
    state: SessionSnapshot,
    #[serde(default)]
    version: u32,
}

#[derive(Debug)]
struct SessionState {
    user: Option<User>,
    token: Option<AccessToken>,
    is_authenticated: bool,
    is_loading: bool,
}

impl SessionState {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user: self.user.clone(),
            token: self.token.clone(),
            is_authenticated: self.is_authenticated,
        }
    }

    fn clear(&mut self) {
        self.user = None;
        self.token = None;
        self.is_authenticated = false;
        self.is_loading = false;
    }

    fn is_cleared(&self) -> bool {
        self.user.is_none() && self.token.is_none() && !self.is_authenticated && !self.is_loading
    }
}

/// The signed-in user, their token, and the flags derived from them.
///
/// Invariants:
/// - `is_authenticated()` implies `token().is_some()`
/// - once `is_loading()` is false it stays false
#[derive(Debug)]
pub struct SessionStore {
    state: RwLock<SessionState>,
    storage: Arc<dyn SnapshotStorage>,
    inspector: TokenInspector,
    changes: watch::Sender<SessionSnapshot>,
}

impl SessionStore {
    /// Create an empty store in the loading state.
    pub fn new(storage: Arc<dyn SnapshotStorage>) -> Self {
        let (changes, _) = watch::channel(SessionSnapshot::default());
        Self {
            state: RwLock::new(SessionState {
                user: None,
                token: None,
                is_authenticated: false,
                is_loading: true,
            }),
            storage,
            inspector: TokenInspector::default(),
            changes,
        }
    }

    /// Use a specific token inspector for expiry checks.
    pub fn with_inspector(mut self, inspector: TokenInspector) -> Self {
        self.inspector = inspector;
        self
    }

    /// Create a store and restore it from storage.
    pub fn restore(storage: Arc<dyn SnapshotStorage>) -> Self {
        let store = Self::new(storage);
        store.rehydrate();
        store
    }

    /// Restore the session from durable storage.
    ///
    /// Runs once; later calls return the current status without reading
    /// storage again. A stored token that is expired or unreadable yields an
    /// unauthenticated session and the snapshot is cleared.
    pub fn rehydrate(&self) -> SessionStatus {
        let mut state = self.write();
        if !state.is_loading {
            return status_of(&state);
        }

        let restored = match self.storage.load(AUTH_STORAGE_KEY) {
            Ok(Some(raw)) => match decode_snapshot(&raw) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    warn!(error = %e, "Ignoring stored session");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read session snapshot");
                None
            }
        };

        match restored {
            Some(SessionSnapshot {
                user,
                token: Some(token),
                ..
            }) => match self.inspector.inspect(token.as_str()) {
                TokenStatus::Valid { .. } => {
                    state.user = user;
                    state.token = Some(token);
                    state.is_authenticated = true;
                    state.is_loading = false;
                    info!("Session restored");
                    self.publish(&state);
                }
                status => {
                    info!(?status, "Stored session is no longer valid");
                    state.clear();
                    self.persist(&state);
                }
            },
            Some(_) => {
                debug!("Stored session has no token");
                state.clear();
                self.persist(&state);
            }
            None => {
                state.is_loading = false;
                self.publish(&state);
            }
        }

        status_of(&state)
    }

    /// Replace the session with the result of a successful sign-in.
    pub fn set_auth(&self, auth: AuthResponse) {
        let mut state = self.write();
        state.user = Some(auth.user);
        state.token = Some(auth.access_token);
        state.is_authenticated = true;
        state.is_loading = false;
        info!("Session established");
        self.persist(&state);
    }

    /// Clear the session. Returns false if it was already cleared.
    pub fn logout(&self) -> bool {
        let mut state = self.write();
        self.clear_locked(&mut state)
    }

    /// Clear the session unless it holds a token other than `token`, the one
    /// a request was sent with (`None` for an anonymous request).
    ///
    /// Returns false and leaves the session alone when a different token has
    /// been stored since, so a late rejection of an old token cannot end a
    /// newer sign-in. An already cleared session counts as ended.
    pub fn logout_if_token(&self, token: Option<&AccessToken>) -> bool {
        let mut state = self.write();
        let replaced = matches!(state.token.as_ref(), Some(current) if Some(current) != token);
        if replaced {
            debug!("Session changed since the request was sent, keeping it");
            return false;
        }
        self.clear_locked(&mut state);
        true
    }

    /// Returns true if a usable token is present. Otherwise clears the
    /// session and returns false.
    pub fn check_token_expiry(&self) -> bool {
        let mut state = self.write();
        self.verify_locked(&mut state).is_ok()
    }

    /// The signed-in user, after the same check as
    /// [`check_token_expiry`](Self::check_token_expiry).
    ///
    /// # Errors
    ///
    /// `AuthError::NotAuthenticated` when there is no session,
    /// `AuthError::SessionExpired` or `AuthError::MalformedToken` when the
    /// stored token is unusable. The session is cleared in every error case.
    pub fn require_user(&self) -> Result<User> {
        let mut state = self.write();
        self.verify_locked(&mut state)?;
        match state.user.clone() {
            Some(user) => Ok(user),
            None => {
                self.clear_locked(&mut state);
                Err(AuthError::NotAuthenticated.into())
            }
        }
    }

    /// Current token, if the session is authenticated.
    pub fn token(&self) -> Option<AccessToken> {
        self.read(|state| state.token.clone())
    }

    /// Current user, if any.
    pub fn user(&self) -> Option<User> {
        self.read(|state| state.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read(|state| state.is_authenticated)
    }

    pub fn is_loading(&self) -> bool {
        self.read(|state| state.is_loading)
    }

    pub fn status(&self) -> SessionStatus {
        self.read(status_of)
    }

    /// The persisted view of the current session.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.read(SessionState::snapshot)
    }

    /// Receive the snapshot after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.changes.subscribe()
    }

    pub fn inspector(&self) -> &TokenInspector {
        &self.inspector
    }

    fn verify_locked(&self, state: &mut SessionState) -> std::result::Result<(), AuthError> {
        let status = match state.token.as_ref() {
            Some(token) => self.inspector.inspect(token.as_str()),
            None => {
                self.clear_locked(state);
                return Err(AuthError::NotAuthenticated);
            }
        };

        match status {
            TokenStatus::Valid { .. } => Ok(()),
            TokenStatus::Expired { .. } => {
                info!(?status, "Access token no longer valid");
                self.clear_locked(state);
                Err(AuthError::SessionExpired)
            }
            TokenStatus::Malformed => {
                info!(?status, "Access token no longer valid");
                self.clear_locked(state);
                Err(AuthError::MalformedToken)
            }
        }
    }

    fn clear_locked(&self, state: &mut SessionState) -> bool {
        if state.is_cleared() {
            return false;
        }
        state.clear();
        info!("Session cleared");
        self.persist(state);
        true
    }

    /// Write the snapshot through to storage and notify subscribers. Storage
    /// failures are logged; the in-memory session stays authoritative.
    fn persist(&self, state: &SessionState) {
        let envelope = PersistedEnvelope {
            state: state.snapshot(),
            version: SNAPSHOT_VERSION,
        };
        match serde_json::to_string(&envelope) {
            Ok(json) => {
                if let Err(e) = self.storage.save(AUTH_STORAGE_KEY, &json) {
                    warn!(error = %e, "Failed to persist session snapshot");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize session snapshot"),
        }
        self.publish(state);
    }

    fn publish(&self, state: &SessionState) {
        self.changes.send_replace(state.snapshot());
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read<T>(&self, f: impl FnOnce(&SessionState) -> T) -> T {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }
}

/// Parse a persisted envelope.
fn decode_snapshot(raw: &str) -> Result<SessionSnapshot> {
    serde_json::from_str::<PersistedEnvelope>(raw)
        .map(|envelope| envelope.state)
        .map_err(|e| {
            crate::Error::from(StorageError::Corrupted {
                key: AUTH_STORAGE_KEY.to_string(),
                message: e.to_string(),
            })
        })
}

fn status_of(state: &SessionState) -> SessionStatus {
    if state.is_loading {
        SessionStatus::Loading
    } else if state.is_authenticated {
        SessionStatus::Authenticated
    } else {
        SessionStatus::Unauthenticated
    }
}
