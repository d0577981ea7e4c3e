//! On-disk credential store: app name → service → credentials and placement.
//!
//! Loaded at process start, merged on every successful refresh, and persisted
//! back to the same JSON file. The file is the only shared mutable state
//! across invocations; read-modify-persist must not interleave, so the store
//! is held behind `&mut` and refreshed at most once per process.

use crate::error::{SyncError, SyncResult};
use crate::types::{AppEntry, ServiceEntry};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default on-disk location, relative to the working directory.
pub const DEFAULT_STORE_FILE: &str = ".siteship-credentials.json";

/// File-backed mapping of app name to per-service credential entries.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    apps: BTreeMap<String, AppEntry>,
}

impl CredentialStore {
    /// Creates an empty store that will persist to `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            apps: BTreeMap::new(),
        }
    }

    /// Loads the store from `path`. A missing file is not an error: it means
    /// no credentials have been cached yet.
    pub fn load(path: impl AsRef<Path>) -> SyncResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("credential file {} not found, starting empty", path.display());
            return Ok(Self::new(path));
        }

        let json = std::fs::read_to_string(path)?;
        let apps: BTreeMap<String, AppEntry> = serde_json::from_str(&json)?;
        Ok(Self {
            path: path.to_path_buf(),
            apps,
        })
    }

    /// Returns the path this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Looks up the entry for `app`/`service`. With no app name, the first
    /// stored app (lexicographic order) is used. Absent app or service
    /// resolves to [`SyncError::MissingCredentials`], never a panic.
    pub fn resolve(&self, app: Option<&str>, service: &str) -> SyncResult<&ServiceEntry> {
        let (name, services) = match app {
            Some(name) => {
                let services = self
                    .apps
                    .get(name)
                    .ok_or_else(|| SyncError::MissingCredentials(name.to_string()))?;
                (name, services)
            }
            None => self
                .apps
                .iter()
                .next()
                .map(|(name, services)| (name.as_str(), services))
                .ok_or_else(|| SyncError::MissingCredentials("(default)".to_string()))?,
        };

        services
            .get(service)
            .ok_or_else(|| SyncError::MissingCredentials(format!("{name}/{service}")))
    }

    /// Overlays `entry` onto the stored entry for `app`/`service`, creating
    /// missing levels. Fields absent from `entry` are preserved; merging the
    /// same entry twice is a no-op.
    pub fn merge(&mut self, app: &str, service: &str, entry: ServiceEntry) {
        self.apps
            .entry(app.to_string())
            .or_default()
            .entry(service.to_string())
            .or_default()
            .apply(entry);
    }

    /// Writes the full mapping back to the credential file. The JSON is
    /// written to a temporary sibling and renamed into place so a crash
    /// mid-write never truncates the store.
    pub fn persist(&self) -> SyncResult<()> {
        let json = serde_json::to_string_pretty(&self.apps)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!("persisted {} app entries to {}", self.apps.len(), self.path.display());
        Ok(())
    }
}
