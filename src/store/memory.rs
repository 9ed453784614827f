//! In-process snapshot store.
//!
//! Keeps everything in a `parking_lot::RwLock`ed map. Writes can be switched
//! to fail, which lets callers exercise their persistence-failure paths.

use crate::error::StorageError;
use crate::store::{SnapshotManifest, SnapshotStore};
use crate::types::{FileEntry, Version, WorkspaceId};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

type VersionKey = (WorkspaceId, Version);

#[derive(Default)]
pub struct MemorySnapshotStore {
    versions: RwLock<BTreeMap<VersionKey, (Vec<FileEntry>, SnapshotManifest)>>,
    fail_writes: AtomicBool,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent delete/insert fail until switched back
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "memory store is rejecting writes".to_string(),
            ));
        }
        Ok(())
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn delete_all_for_version(
        &self,
        workspace: &WorkspaceId,
        version: Version,
    ) -> Result<(), StorageError> {
        self.check_writable()?;
        self.versions.write().remove(&(workspace.clone(), version));
        Ok(())
    }

    fn create_batch(
        &self,
        workspace: &WorkspaceId,
        version: Version,
        entries: &[FileEntry],
    ) -> Result<(), StorageError> {
        self.check_writable()?;
        let mut versions = self.versions.write();
        let slot = versions
            .entry((workspace.clone(), version))
            .or_insert_with(|| (Vec::new(), SnapshotManifest::for_entries(&[])));
        let mut merged: BTreeMap<String, String> =
            slot.0.drain(..).map(|e| (e.path, e.content)).collect();
        for entry in entries {
            merged.insert(entry.path.clone(), entry.content.clone());
        }
        slot.0 = merged
            .into_iter()
            .map(|(path, content)| FileEntry { path, content })
            .collect();
        slot.1 = SnapshotManifest::for_entries(&slot.0);
        Ok(())
    }

    fn load_version(
        &self,
        workspace: &WorkspaceId,
        version: Version,
    ) -> Result<Option<Vec<FileEntry>>, StorageError> {
        Ok(self
            .versions
            .read()
            .get(&(workspace.clone(), version))
            .map(|(entries, _)| entries.clone()))
    }

    fn list_versions(
        &self,
        workspace: &WorkspaceId,
    ) -> Result<Vec<(Version, SnapshotManifest)>, StorageError> {
        Ok(self
            .versions
            .read()
            .iter()
            .filter(|((ws, _), _)| ws == workspace)
            .map(|((_, version), (_, manifest))| (*version, manifest.clone()))
            .collect())
    }
}
