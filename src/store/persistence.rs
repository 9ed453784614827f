//! Sled-backed snapshot store
//!
//! Two trees share one database:
//! - `entries`: `<workspace>\0<version BE u64><path>` -> bincode(content)
//! - `manifests`: `<workspace>\0<version BE u64>` -> bincode(SnapshotManifest)
//!
//! Big-endian versions keep each workspace's keys in version order, so a
//! prefix scan lists versions ascending.

use crate::error::StorageError;
use crate::store::{SnapshotManifest, SnapshotStore};
use crate::types::{FileEntry, Version, WorkspaceId};
use std::path::Path;

const ENTRIES_TREE: &str = "entries";
const MANIFESTS_TREE: &str = "manifests";

pub struct SledSnapshotStore {
    db: sled::Db,
    entries: sled::Tree,
    manifests: sled::Tree,
}

impl SledSnapshotStore {
    /// Open (or create) a store at `path`
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(path)?;
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    pub fn from_db(db: sled::Db) -> Result<Self, StorageError> {
        let entries = db.open_tree(ENTRIES_TREE)?;
        let manifests = db.open_tree(MANIFESTS_TREE)?;
        Ok(Self {
            db,
            entries,
            manifests,
        })
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}

fn workspace_prefix(workspace: &WorkspaceId) -> Vec<u8> {
    let mut key = Vec::with_capacity(workspace.as_str().len() + 1);
    key.extend_from_slice(workspace.as_str().as_bytes());
    key.push(0);
    key
}

fn version_key(workspace: &WorkspaceId, version: Version) -> Vec<u8> {
    let mut key = workspace_prefix(workspace);
    key.extend_from_slice(&version.to_be_bytes());
    key
}

fn entry_key(workspace: &WorkspaceId, version: Version, path: &str) -> Vec<u8> {
    let mut key = version_key(workspace, version);
    key.extend_from_slice(path.as_bytes());
    key
}

fn corrupt(key: &[u8], reason: impl Into<String>) -> StorageError {
    StorageError::CorruptRecord {
        key: String::from_utf8_lossy(key).into_owned(),
        reason: reason.into(),
    }
}

impl SnapshotStore for SledSnapshotStore {
    fn delete_all_for_version(
        &self,
        workspace: &WorkspaceId,
        version: Version,
    ) -> Result<(), StorageError> {
        let prefix = version_key(workspace, version);
        let mut batch = sled::Batch::default();
        let mut removed = 0usize;
        for item in self.entries.scan_prefix(&prefix).keys() {
            batch.remove(item?);
            removed += 1;
        }
        self.entries.apply_batch(batch)?;
        self.manifests.remove(&prefix)?;
        self.flush()?;
        tracing::debug!(%workspace, version, removed, "deleted stored version");
        Ok(())
    }

    fn create_batch(
        &self,
        workspace: &WorkspaceId,
        version: Version,
        entries: &[FileEntry],
    ) -> Result<(), StorageError> {
        let mut batch = sled::Batch::default();
        for entry in entries {
            let value = bincode::serialize(&entry.content)?;
            batch.insert(entry_key(workspace, version, &entry.path), value);
        }
        self.entries.apply_batch(batch)?;

        // manifest describes everything now stored for the version
        let stored = self.load_version(workspace, version)?.unwrap_or_default();
        let manifest = SnapshotManifest::for_entries(&stored);
        self.manifests.insert(
            version_key(workspace, version),
            bincode::serialize(&manifest)?,
        )?;
        self.flush()?;
        Ok(())
    }

    fn load_version(
        &self,
        workspace: &WorkspaceId,
        version: Version,
    ) -> Result<Option<Vec<FileEntry>>, StorageError> {
        let prefix = version_key(workspace, version);
        let mut loaded = Vec::new();
        for item in self.entries.scan_prefix(&prefix) {
            let (key, value) = item?;
            let path = std::str::from_utf8(&key[prefix.len()..])
                .map_err(|e| corrupt(&key, format!("path is not UTF-8: {}", e)))?
                .to_string();
            let content: String = bincode::deserialize(&value)?;
            loaded.push(FileEntry { path, content });
        }

        if loaded.is_empty() && !self.manifests.contains_key(&prefix)? {
            return Ok(None);
        }
        Ok(Some(loaded))
    }

    fn list_versions(
        &self,
        workspace: &WorkspaceId,
    ) -> Result<Vec<(Version, SnapshotManifest)>, StorageError> {
        let prefix = workspace_prefix(workspace);
        let mut versions = Vec::new();
        for item in self.manifests.scan_prefix(&prefix) {
            let (key, value) = item?;
            let raw: [u8; 8] = key[prefix.len()..]
                .try_into()
                .map_err(|_| corrupt(&key, "version suffix is not 8 bytes"))?;
            let manifest: SnapshotManifest = bincode::deserialize(&value)?;
            versions.push((Version::from_be_bytes(raw), manifest));
        }
        Ok(versions)
    }
}
