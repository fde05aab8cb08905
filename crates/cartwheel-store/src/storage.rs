//! Durable local snapshot storage.
//!
//! The whole snapshot is the unit of persistence: every change is serialized
//! after the in-memory update. Writes are best-effort with no failure path
//! exposed to the caller; a broken disk degrades to a cart that forgets
//! between sessions, never to a failed mutation.

use std::fs;
use std::path::PathBuf;

use cartwheel_core::CartLine;

/// Load-once/save-often persistence for cart snapshots.
pub trait SnapshotStorage {
    /// Reads the persisted snapshot, or `None` when absent or unreadable.
    fn load(&self) -> Option<Vec<CartLine>>;

    /// Persists the snapshot. Best-effort; failures are logged and swallowed.
    fn save(&mut self, lines: &[CartLine]);
}

/// Snapshot storage backed by a single JSON file.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotStorage for JsonFileStorage {
    fn load(&self) -> Option<Vec<CartLine>> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(lines) => Some(lines),
            Err(err) => {
                tracing::debug!(path = %self.path.display(), error = %err, "ignoring unreadable cart snapshot");
                None
            }
        }
    }

    fn save(&mut self, lines: &[CartLine]) {
        let json = match serde_json::to_string(lines) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize cart snapshot");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                let _ = fs::create_dir_all(parent);
            }
        }
        if let Err(err) = fs::write(&self.path, json) {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to persist cart snapshot");
        }
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    saved: Option<Vec<CartLine>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with a persisted snapshot, as if a previous
    /// session had saved it.
    #[must_use]
    pub fn with_lines(lines: Vec<CartLine>) -> Self {
        Self { saved: Some(lines) }
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&self) -> Option<Vec<CartLine>> {
        self.saved.clone()
    }

    fn save(&mut self, lines: &[CartLine]) {
        self.saved = Some(lines.to_vec());
    }
}
