//! Navigation capability used to send the user back to the login screen.

use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Location of the login screen.
pub const LOGIN_PATH: &str = "/auth/login";

/// Where the user currently is, and how to move them.
///
/// Browser front-ends map this onto page navigation, terminal front-ends onto
/// a notice, tests onto a recorder.
pub trait Navigator: Send + Sync + fmt::Debug {
    /// Path of the current location.
    fn current_path(&self) -> String;

    /// Move to `path`.
    fn navigate(&self, path: &str);
}

/// Navigator that remembers the location and counts navigations.
#[derive(Debug)]
pub struct MemoryNavigator {
    inner: Mutex<MemoryNavigatorState>,
}

#[derive(Debug)]
struct MemoryNavigatorState {
    path: String,
    history: Vec<String>,
}

impl MemoryNavigator {
    pub fn at(path: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(MemoryNavigatorState {
                path: path.into(),
                history: Vec::new(),
            }),
        }
    }

    /// Paths navigated to, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryNavigatorState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::at("/")
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.lock().path.clone()
    }

    fn navigate(&self, path: &str) {
        let mut state = self.lock();
        state.path = path.to_string();
        state.history.push(path.to_string());
    }
}
