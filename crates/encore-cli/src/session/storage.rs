//! Where the CLI keeps its session.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use encore_core::SessionStore;
use encore_file::FileStorage;

/// Resolve the data directory: the explicit override, or the platform data
/// directory for `encore`.
pub fn data_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }
    let dirs =
        ProjectDirs::from("", "", "encore").context("Could not determine data directory")?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Restore the session stored under `data_dir`.
pub fn open_session(data_dir: &Path) -> Arc<SessionStore> {
    let storage = Arc::new(FileStorage::new(data_dir));
    Arc::new(SessionStore::restore(storage))
}
