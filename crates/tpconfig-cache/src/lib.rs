//! Shared, reloadable view of one tp_config file.
//!
//! A [`DocumentCache`] parses its file on first use and hands out
//! [`Arc<Snapshot>`]s. A reload parses the file again off to the side and
//! then swaps the pointer, so a reader holds either the old snapshot or the
//! new one and never a half-built document.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::SystemTime;

use tpconfig_tree::{ConfigDocument, Diagnostic, LoadError, parse_file};
use tracing::{debug, info, warn};

/// One parsed version of the file.
#[derive(Debug)]
pub struct Snapshot {
    pub document: ConfigDocument,
    pub diagnostics: Vec<Diagnostic>,
    /// When this snapshot finished loading.
    pub loaded_at: SystemTime,
}

/// Error from [`DocumentCache::get`] or [`DocumentCache::reload`].
#[derive(Debug)]
pub struct ReloadError {
    error: LoadError,
}

impl ReloadError {
    /// The underlying load failure.
    pub fn load_error(&self) -> &LoadError {
        &self.error
    }

    /// Take the underlying load failure.
    pub fn into_load_error(self) -> LoadError {
        self.error
    }
}

impl std::fmt::Display for ReloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "reload failed: {}", self.error)
    }
}

impl std::error::Error for ReloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<LoadError> for ReloadError {
    fn from(error: LoadError) -> Self {
        Self { error }
    }
}

/// Lazily loaded, atomically swapped document for one file.
pub struct DocumentCache {
    path: PathBuf,
    /// Current snapshot; the lock is only held to copy or swap the pointer.
    current: RwLock<Option<Arc<Snapshot>>>,
    /// Held for the whole rebuild so at most one runs at a time.
    rebuild: Mutex<()>,
}

impl DocumentCache {
    /// Create a cache for `path`. Nothing is read until the first [`get`](Self::get).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: RwLock::new(None),
            rebuild: Mutex::new(()),
        }
    }

    /// The current snapshot, loading the file if nothing is loaded yet.
    pub fn get(&self) -> Result<Arc<Snapshot>, ReloadError> {
        if let Some(snapshot) = self.peek() {
            return Ok(snapshot);
        }

        let _guard = self.rebuild.lock().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have loaded it while we waited.
        if let Some(snapshot) = self.peek() {
            return Ok(snapshot);
        }
        debug!(path = ?self.path, "loading configuration on first use");
        self.rebuild_locked()
    }

    /// The current snapshot without loading anything.
    pub fn peek(&self) -> Option<Arc<Snapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Parse the file again and publish the result.
    ///
    /// On failure the previous snapshot stays in place.
    pub fn reload(&self) -> Result<Arc<Snapshot>, ReloadError> {
        let _guard = self.rebuild.lock().unwrap_or_else(PoisonError::into_inner);
        self.rebuild_locked().inspect_err(|error| {
            warn!(path = ?self.path, %error, "keeping previous configuration");
        })
    }

    /// When the current snapshot was loaded, if any.
    pub fn last_update(&self) -> Option<SystemTime> {
        self.peek().map(|snapshot| snapshot.loaded_at)
    }

    /// Must be called with `rebuild` held.
    fn rebuild_locked(&self) -> Result<Arc<Snapshot>, ReloadError> {
        let parsed = parse_file(&self.path)?;
        let snapshot = Arc::new(Snapshot {
            document: parsed.document,
            diagnostics: parsed.diagnostics,
            loaded_at: SystemTime::now(),
        });

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        info!(path = ?self.path, "configuration snapshot published");
        Ok(snapshot)
    }
}
