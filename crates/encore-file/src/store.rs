//! One JSON file per storage key.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, instrument, trace};
use uuid::Uuid;

use encore_core::Result;
use encore_core::error::{Error, InvalidInputError, StorageError};
use encore_core::storage::SnapshotStorage;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

fn map_io(key: &str, err: std::io::Error) -> Error {
    Error::Storage(StorageError::Io {
        key: key.to_string(),
        message: err.to_string(),
    })
}

/// Durable storage rooted at a directory.
///
/// Each key lives in `<root>/<key>.json`. Writes go to a temporary file that
/// is renamed over the target, under an exclusive lock on `<key>.lock`, so
/// concurrent processes never observe a half-written snapshot.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at `root`. The directory is created on first write.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        Ok(self.root.join(format!("{}.json", Self::file_stem(key)?)))
    }

    fn lock_path(&self, key: &str) -> Result<PathBuf> {
        Ok(self.root.join(format!("{}.lock", Self::file_stem(key)?)))
    }

    fn file_stem(key: &str) -> Result<&str> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(key)
        } else {
            Err(InvalidInputError::Other {
                message: format!("storage key '{}' must be alphanumeric, '-' or '_'", key),
            }
            .into())
        }
    }

    fn ensure_root(&self, key: &str) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| map_io(key, e))
    }

    /// Run `f` while holding the exclusive lock for `key`.
    fn with_lock<T>(&self, key: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock_path = self.lock_path(key)?;
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| map_io(key, e))?;

        lock_file.lock_exclusive().map_err(|e| map_io(key, e))?;
        trace!(key, "Acquired storage lock");
        let result = f();
        lock_file.unlock().map_err(|e| map_io(key, e))?;
        result
    }

    fn write_temp(temp_path: &Path, key: &str, value: &str) -> Result<()> {
        let mut file = fs::File::create(temp_path).map_err(|e| map_io(key, e))?;
        file.write_all(value.as_bytes())
            .map_err(|e| map_io(key, e))?;
        file.sync_all().map_err(|e| map_io(key, e))?;
        drop(file);
        Self::restrict_permissions(temp_path, key)
    }

    #[cfg(unix)]
    fn restrict_permissions(path: &Path, key: &str) -> Result<()> {
        let mut perms = fs::metadata(path).map_err(|e| map_io(key, e))?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms).map_err(|e| map_io(key, e))
    }

    #[cfg(not(unix))]
    fn restrict_permissions(_path: &Path, _key: &str) -> Result<()> {
        Ok(())
    }
}

impl SnapshotStorage for FileStorage {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            debug!("No stored value");
            return Ok(None);
        }
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_io(key, e)),
        }
    }

    #[instrument(skip(self, value), fields(root = %self.root.display()))]
    fn save(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        self.ensure_root(key)?;

        self.with_lock(key, || {
            let temp_path = self
                .root
                .join(format!(".{}.{}.tmp", Self::file_stem(key)?, Uuid::new_v4()));

            let written = Self::write_temp(&temp_path, key, value)
                .and_then(|()| fs::rename(&temp_path, &path).map_err(|e| map_io(key, e)));
            if let Err(e) = written {
                if let Err(cleanup) = fs::remove_file(&temp_path) {
                    trace!(error = %cleanup, "Temp file already gone");
                }
                return Err(e);
            }
            debug!(bytes = value.len(), "Stored value");
            Ok(())
        })
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if !self.root.exists() {
            return Ok(());
        }

        self.with_lock(key, || match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed stored value");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io(key, e)),
        })
    }
}
