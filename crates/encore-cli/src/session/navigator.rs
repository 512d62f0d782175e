//! Navigation for a terminal front-end.

use std::sync::{Mutex, PoisonError};

use tracing::debug;

use encore_core::{LOGIN_PATH, Navigator};

use crate::output;

/// Tracks a notional location and tells the user when they are sent to the
/// login screen.
#[derive(Debug)]
pub struct TerminalNavigator {
    path: Mutex<String>,
}

impl TerminalNavigator {
    pub fn new() -> Self {
        Self {
            path: Mutex::new("/".to_string()),
        }
    }
}

impl Default for TerminalNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for TerminalNavigator {
    fn current_path(&self) -> String {
        self.path
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn navigate(&self, path: &str) {
        *self.path.lock().unwrap_or_else(PoisonError::into_inner) = path.to_string();
        if path == LOGIN_PATH {
            output::warning("Session ended. Run 'encore auth signin' to sign in again.");
        } else {
            debug!(to = path, "Navigated");
        }
    }
}
