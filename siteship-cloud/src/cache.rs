//! Local upload cache: content hashes of previously uploaded objects.
//!
//! The cache only short-circuits unchanged uploads. A missing, stale, or
//! corrupt cache still yields a correct mirror; it is rebuilt from scratch
//! on every successful publish.

use crate::error::SyncResult;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Every upload-cache file name starts with this prefix.
pub const CACHE_FILE_PREFIX: &str = ".siteship-cache";

/// Hex sha256 of a file's contents, used to detect unchanged uploads.
pub fn content_hash(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Per-bucket map of remote key → content hash at last upload.
#[derive(Debug, Default)]
pub struct UploadCache {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl UploadCache {
    /// Cache file path for a bucket under the cache directory.
    pub fn file_for(cache_dir: &Path, bucket: &str) -> PathBuf {
        cache_dir.join(format!("{CACHE_FILE_PREFIX}-{bucket}"))
    }

    /// Loads the cache at `path`. Missing or unreadable caches load as
    /// empty: the next run uploads everything and rebuilds the file.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("discarding corrupt upload cache {}: {e}", path.display());
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self { path, entries }
    }

    /// True when the cache holds `key` with exactly this hash, meaning the
    /// object was already uploaded with the current contents.
    pub fn matches(&self, key: &str, hash: &str) -> bool {
        self.entries.get(key).is_some_and(|cached| cached == hash)
    }

    pub fn record(&mut self, key: String, hash: String) {
        self.entries.insert(key, hash);
    }

    /// Replaces all entries with this run's outcomes, dropping keys that no
    /// longer exist locally or whose upload failed.
    pub fn replace(&mut self, entries: BTreeMap<String, String>) {
        self.entries = entries;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the cache back to disk via a temporary sibling and rename.
    pub fn persist(&self) -> SyncResult<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!("persisted {} cache entries to {}", self.entries.len(), self.path.display());
        Ok(())
    }
}

/// Removes every upload-cache file in `dir`. Idempotent: a directory with
/// no matching files is a successful no-op. Returns the removed paths.
pub fn clean(dir: &Path) -> SyncResult<Vec<PathBuf>> {
    let mut removed = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with(CACHE_FILE_PREFIX) && entry.path().is_file() {
            std::fs::remove_file(entry.path())?;
            debug!("removed upload cache {}", entry.path().display());
            removed.push(entry.path());
        }
    }

    Ok(removed)
}
