//! Snapshot Store
//!
//! Persistence port for workspace snapshots. A backend only needs
//! "replace everything stored for this version" semantics: bulk delete and
//! batch insert, plus reads for loading a session.

pub mod memory;
pub mod persistence;
pub mod snapshot;

use crate::error::StorageError;
use crate::types::{FileEntry, Version, WorkspaceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use memory::MemorySnapshotStore;
pub use persistence::SledSnapshotStore;
pub use snapshot::{SaveReport, Snapshot, VersionInfo, VersionedSnapshotStore};

/// Per-version record written alongside a batch of entries.
///
/// Its presence marks the version as saved, even when the batch was empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotManifest {
    pub entry_count: usize,
    /// Hex blake3 digest of the sorted entries
    pub fingerprint: String,
    pub saved_at: DateTime<Utc>,
}

impl SnapshotManifest {
    pub fn for_entries(entries: &[FileEntry]) -> Self {
        Self {
            entry_count: entries.len(),
            fingerprint: hex::encode(snapshot::fingerprint_entries(entries)),
            saved_at: Utc::now(),
        }
    }
}

/// Snapshot store interface
pub trait SnapshotStore: Send + Sync {
    /// Remove every entry (and the manifest) stored for `(workspace, version)`
    fn delete_all_for_version(
        &self,
        workspace: &WorkspaceId,
        version: Version,
    ) -> Result<(), StorageError>;

    /// Insert `entries` under `(workspace, version)` in one batch
    fn create_batch(
        &self,
        workspace: &WorkspaceId,
        version: Version,
        entries: &[FileEntry],
    ) -> Result<(), StorageError>;

    /// Entries stored for `(workspace, version)`, sorted by path; `None` if never saved
    fn load_version(
        &self,
        workspace: &WorkspaceId,
        version: Version,
    ) -> Result<Option<Vec<FileEntry>>, StorageError>;

    /// Saved versions of `workspace`, ascending
    fn list_versions(
        &self,
        workspace: &WorkspaceId,
    ) -> Result<Vec<(Version, SnapshotManifest)>, StorageError>;
}
