//! Filesystem storage for the session token pair.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use scribe_core::error::{Error, StorageError};
use scribe_core::{Result, TokenPair, TokenStore};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Default token file name within the client data directory.
pub const TOKEN_FILE: &str = "auth_tokens.json";

fn map_io(path: &Path, err: io::Error) -> Error {
    Error::Storage(StorageError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// On-disk form of the token pair.
///
/// Both token fields are required, so a file holding only half a pair
/// is treated as corrupt.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTokens {
    access_token: String,
    refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<DateTime<Utc>>,
}

/// A [`TokenStore`] persisted as a single JSON file.
///
/// Writes go to a uniquely named temporary file which is then renamed over
/// the token file, so a concurrent reader sees either the old pair or the
/// new one. Writers in different processes serialize on an exclusive lock
/// file next to the token file. On Unix the file is readable by its owner
/// only.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store backed by the file at `path`.
    ///
    /// Nothing is touched on disk until the first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a store using [`TOKEN_FILE`] inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(TOKEN_FILE))
    }

    /// Get the token file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the stored pair was last written, if a pair is stored.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.load().and_then(|stored| stored.saved_at)
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn temp_path(&self) -> PathBuf {
        self.path
            .with_extension(format!("{}.tmp", Uuid::new_v4().simple()))
    }

    /// Read and decode the token file, discarding it if it is unusable.
    fn load(&self) -> Option<StoredTokens> {
        match self.try_load() {
            Ok(stored) => stored,
            Err(reason) => {
                debug!(%reason, "Token file unusable, rechecking under lock");
                self.recover()
            }
        }
    }

    /// Re-read the file under the lock and remove it only if it is still
    /// unusable. A writer may have replaced it since the unlocked read.
    fn recover(&self) -> Option<StoredTokens> {
        let recovered = self.with_lock(|| match self.try_load() {
            Ok(stored) => Ok(stored),
            Err(reason) => {
                warn!(path = %self.path.display(), %reason, "Token file corrupt, discarding");
                self.remove_file()?;
                Ok(None)
            }
        });

        recovered.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to remove unusable token file");
            None
        })
    }

    /// Read the token file without locking. A missing file is `Ok(None)`.
    fn try_load(&self) -> std::result::Result<Option<StoredTokens>, String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.to_string()),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| e.to_string())
    }

    /// Remove the token file; the caller holds the lock.
    fn remove_file(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed token file");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io(&self.path, e)),
        }
    }

    /// Run `f` while holding the exclusive store lock.
    fn with_lock<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock_path = self.lock_path();

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(|e| map_io(parent, e))?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| map_io(&lock_path, e))?;

        lock_file
            .lock_exclusive()
            .map_err(|e| map_io(&lock_path, e))?;

        let result = f();

        lock_file.unlock().map_err(|e| map_io(&lock_path, e))?;

        result
    }

    fn write_temp(&self, temp_path: &Path, content: &str) -> Result<()> {
        let mut file = File::create(temp_path).map_err(|e| map_io(temp_path, e))?;

        // Set restrictive permissions before any secret is written
        #[cfg(unix)]
        {
            let mut perms = file
                .metadata()
                .map_err(|e| map_io(temp_path, e))?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(temp_path, perms).map_err(|e| map_io(temp_path, e))?;
        }

        file.write_all(content.as_bytes())
            .map_err(|e| map_io(temp_path, e))?;
        file.sync_all().map_err(|e| map_io(temp_path, e))?;

        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn read(&self) -> Option<TokenPair> {
        self.load()
            .map(|stored| TokenPair::new(stored.access_token, stored.refresh_token))
    }

    #[instrument(skip(self, pair), fields(path = %self.path.display()))]
    fn write(&self, pair: &TokenPair) -> Result<()> {
        let stored = StoredTokens {
            access_token: pair.access_token().as_str().to_string(),
            refresh_token: pair.refresh_token().as_str().to_string(),
            saved_at: Some(Utc::now()),
        };

        let content = serde_json::to_string_pretty(&stored).map_err(|e| {
            Error::Storage(StorageError::Serialization {
                message: e.to_string(),
            })
        })?;

        self.with_lock(|| {
            let temp_path = self.temp_path();

            if let Err(e) = self.write_temp(&temp_path, &content) {
                let _ = fs::remove_file(&temp_path);
                return Err(e);
            }

            if let Err(e) = fs::rename(&temp_path, &self.path) {
                let _ = fs::remove_file(&temp_path);
                return Err(map_io(&self.path, e));
            }

            Ok(())
        })?;

        debug!("Stored token pair");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn clear(&self) -> Result<()> {
        self.with_lock(|| self.remove_file())
    }
}
