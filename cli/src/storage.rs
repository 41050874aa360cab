//! Session storage backed by a small JSON object on disk.

use std::{
    collections::BTreeMap,
    fs::{self, File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use visvas_shared::session::{KeyValueStorage, StorageError};

/// Key/value pairs persisted as one JSON object per file. Every call
/// re-reads the file, so two processes sharing it see each other's writes.
/// A missing or unparsable file reads as empty.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage backed by `path`. Nothing is read until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, String> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            tracing::warn!("ignoring unreadable session file {}: {err}", self.path.display());
            BTreeMap::new()
        })
    }

    fn store(&self, entries: &BTreeMap<String, String>, key: &str) -> Result<(), StorageError> {
        let write_error = |reason: String| StorageError::Write {
            key: key.to_string(),
            reason,
        };
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| write_error(err.to_string()))?;
        }
        let body = serde_json::to_string_pretty(entries)?;
        let mut file = open_private(&self.path).map_err(|err| write_error(err.to_string()))?;
        file.write_all(body.as_bytes())
            .map_err(|err| write_error(err.to_string()))
    }
}

/// Truncate or create `path` readable by the owner only; the file holds a
/// bearer token.
fn open_private(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let file = options.open(path)?;
    // `mode` only applies on creation; tighten files left by older runs.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    Ok(file)
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.load();
        entries.insert(key.to_string(), value.to_string());
        self.store(&entries, key)
    }

    fn remove(&self, key: &str) {
        let mut entries = self.load();
        if entries.remove(key).is_none() {
            return;
        }
        let result = if entries.is_empty() {
            fs::remove_file(&self.path).map_err(|err| StorageError::Write {
                key: key.to_string(),
                reason: err.to_string(),
            })
        } else {
            self.store(&entries, key)
        };
        if let Err(err) = result {
            tracing::warn!("failed to remove `{key}` from {}: {err}", self.path.display());
        }
    }
}
