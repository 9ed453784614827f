//! Versioned snapshots
//!
//! A save writes the same full snapshot under `version` and `version + 1`
//! ("mirror-forward"), replacing whatever both held before. The next editing
//! session can then start from `version + 1` as a ready-made copy.

use crate::error::StorageError;
use crate::store::{SnapshotManifest, SnapshotStore};
use crate::types::{FileEntry, Fingerprint, Version, WorkspaceId};
use crate::workspace::EditableWorkspace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Digest of entries in path order; input order does not matter.
pub fn fingerprint_entries(entries: &[FileEntry]) -> Fingerprint {
    let mut sorted: Vec<&FileEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));

    let mut hasher = blake3::Hasher::new();
    for entry in sorted {
        hasher.update(&(entry.path.len() as u64).to_le_bytes());
        hasher.update(entry.path.as_bytes());
        hasher.update(&(entry.content.len() as u64).to_le_bytes());
        hasher.update(entry.content.as_bytes());
    }
    *hasher.finalize().as_bytes()
}

/// Full path -> content copy of a workspace at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    files: BTreeMap<String, String>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Copy every readable file out of `workspace`
    pub fn capture<W>(workspace: &W) -> Self
    where
        W: EditableWorkspace + ?Sized,
    {
        let files = workspace
            .list_paths()
            .into_iter()
            .filter_map(|p| workspace.get_content(&p).map(|c| (p, c)))
            .collect();
        Self { files }
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = FileEntry>,
    {
        Self {
            files: entries.into_iter().map(|e| (e.path, e.content)).collect(),
        }
    }

    /// Serialized form: `(path, content)` pairs sorted by path
    pub fn entries(&self) -> Vec<FileEntry> {
        self.files
            .iter()
            .map(|(p, c)| FileEntry::new(p.clone(), c.clone()))
            .collect()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// True if the path sets differ or any shared path has different content
    pub fn differs_from(&self, other: &Snapshot) -> bool {
        if !self.paths().eq(other.paths()) {
            return true;
        }
        self.files
            .iter()
            .any(|(path, content)| other.get(path) != Some(content.as_str()))
    }

    /// Write every file into `workspace`
    pub fn restore_into<W>(&self, workspace: &mut W)
    where
        W: EditableWorkspace + ?Sized,
    {
        for (path, content) in &self.files {
            workspace.set_content(path, content.clone());
        }
    }
}

/// Result of a successful save
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveReport {
    pub workspace_id: WorkspaceId,
    pub version: Version,
    pub next_version: Version,
    pub entry_count: usize,
    pub fingerprint: String,
}

/// A saved version and its manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub version: Version,
    #[serde(flatten)]
    pub manifest: SnapshotManifest,
}

/// Mirror-forward snapshot persistence over any [`SnapshotStore`]
#[derive(Clone)]
pub struct VersionedSnapshotStore {
    backend: Arc<dyn SnapshotStore>,
}

impl VersionedSnapshotStore {
    pub fn new(backend: Arc<dyn SnapshotStore>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn SnapshotStore> {
        &self.backend
    }

    /// Persist `snapshot` as both `version` and `version + 1`.
    ///
    /// Both versions are cleared first, then both are written from the same
    /// serialized entries. Any backend failure aborts the save.
    pub fn save(
        &self,
        workspace: &WorkspaceId,
        version: Version,
        snapshot: &Snapshot,
    ) -> Result<SaveReport, StorageError> {
        let next_version = version
            .checked_add(1)
            .ok_or(StorageError::VersionOverflow(version))?;
        let entries = snapshot.entries();

        self.backend.delete_all_for_version(workspace, version)?;
        self.backend.delete_all_for_version(workspace, next_version)?;
        debug!(%workspace, version, next_version, "cleared versions for save");

        self.backend.create_batch(workspace, version, &entries)?;
        self.backend.create_batch(workspace, next_version, &entries)?;

        let report = SaveReport {
            workspace_id: workspace.clone(),
            version,
            next_version,
            entry_count: entries.len(),
            fingerprint: hex::encode(fingerprint_entries(&entries)),
        };
        info!(
            %workspace,
            version,
            next_version,
            entries = report.entry_count,
            fingerprint = %report.fingerprint,
            "snapshot saved"
        );
        Ok(report)
    }

    /// Load the snapshot stored for `version`, if it was ever saved
    pub fn load(
        &self,
        workspace: &WorkspaceId,
        version: Version,
    ) -> Result<Option<Snapshot>, StorageError> {
        Ok(self
            .backend
            .load_version(workspace, version)?
            .map(Snapshot::from_entries))
    }

    pub fn latest_version(&self, workspace: &WorkspaceId) -> Result<Option<Version>, StorageError> {
        Ok(self
            .backend
            .list_versions(workspace)?
            .last()
            .map(|(version, _)| *version))
    }

    pub fn versions(&self, workspace: &WorkspaceId) -> Result<Vec<VersionInfo>, StorageError> {
        Ok(self
            .backend
            .list_versions(workspace)?
            .into_iter()
            .map(|(version, manifest)| VersionInfo { version, manifest })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySnapshotStore;
    use parking_lot::Mutex;

    fn ws_id() -> WorkspaceId {
        WorkspaceId::new("deck").unwrap()
    }

    fn snapshot(entries: &[(&str, &str)]) -> Snapshot {
        Snapshot::from_entries(entries.iter().map(|(p, c)| FileEntry::new(*p, *c)))
    }

    /// Records backend calls in order
    #[derive(Default)]
    struct CallLog {
        calls: Mutex<Vec<String>>,
        inner: MemorySnapshotStore,
    }

    impl SnapshotStore for CallLog {
        fn delete_all_for_version(&self, ws: &WorkspaceId, v: Version) -> Result<(), StorageError> {
            self.calls.lock().push(format!("delete {v}"));
            self.inner.delete_all_for_version(ws, v)
        }
        fn create_batch(&self, ws: &WorkspaceId, v: Version, e: &[FileEntry]) -> Result<(), StorageError> {
            self.calls.lock().push(format!("insert {v} ({})", e.len()));
            self.inner.create_batch(ws, v, e)
        }
        fn load_version(&self, ws: &WorkspaceId, v: Version) -> Result<Option<Vec<FileEntry>>, StorageError> {
            self.inner.load_version(ws, v)
        }
        fn list_versions(&self, ws: &WorkspaceId) -> Result<Vec<(Version, SnapshotManifest)>, StorageError> {
            self.inner.list_versions(ws)
        }
    }

    #[test]
    fn test_save_clears_then_writes_both_versions() {
        let log = Arc::new(CallLog::default());
        let store = VersionedSnapshotStore::new(log.clone());
        let snap = snapshot(&[("/a.txt", "a"), ("/b/c.txt", "c")]);

        let report = store.save(&ws_id(), 4, &snap).unwrap();
        assert_eq!(report.version, 4);
        assert_eq!(report.next_version, 5);
        assert_eq!(report.entry_count, 2);
        assert_eq!(
            *log.calls.lock(),
            vec!["delete 4", "delete 5", "insert 4 (2)", "insert 5 (2)"]
        );
    }

    #[test]
    fn test_mirror_forward_round_trip() {
        let store = VersionedSnapshotStore::new(Arc::new(MemorySnapshotStore::new()));
        let snap = snapshot(&[("/index.js", "main()"), ("/lib/utils.js", "export {}")]);
        store.save(&ws_id(), 0, &snap).unwrap();

        let current = store.load(&ws_id(), 0).unwrap().unwrap();
        let next = store.load(&ws_id(), 1).unwrap().unwrap();
        assert_eq!(current, snap);
        assert_eq!(next, snap);
        assert_eq!(store.latest_version(&ws_id()).unwrap(), Some(1));
    }

    #[test]
    fn test_save_replaces_previous_contents() {
        let store = VersionedSnapshotStore::new(Arc::new(MemorySnapshotStore::new()));
        store.save(&ws_id(), 1, &snapshot(&[("/old.txt", "x")])).unwrap();
        store.save(&ws_id(), 1, &snapshot(&[("/new.txt", "y")])).unwrap();

        let loaded = store.load(&ws_id(), 2).unwrap().unwrap();
        assert_eq!(loaded.paths().collect::<Vec<_>>(), vec!["/new.txt"]);
    }

    #[test]
    fn test_save_is_idempotent() {
        let store = VersionedSnapshotStore::new(Arc::new(MemorySnapshotStore::new()));
        let snap = snapshot(&[("/a.txt", "a")]);
        let first = store.save(&ws_id(), 0, &snap).unwrap();
        let after_first = store.load(&ws_id(), 0).unwrap();
        let second = store.save(&ws_id(), 0, &snap).unwrap();
        assert_eq!(first.fingerprint, second.fingerprint);
        assert_eq!(after_first, store.load(&ws_id(), 0).unwrap());
    }

    #[test]
    fn test_empty_snapshot_still_marks_version() {
        let store = VersionedSnapshotStore::new(Arc::new(MemorySnapshotStore::new()));
        store.save(&ws_id(), 0, &Snapshot::empty()).unwrap();
        assert_eq!(store.load(&ws_id(), 1).unwrap(), Some(Snapshot::empty()));
        assert!(store.load(&ws_id(), 2).unwrap().is_none());
    }

    #[test]
    fn test_version_overflow_touches_nothing() {
        let log = Arc::new(CallLog::default());
        let store = VersionedSnapshotStore::new(log.clone());
        let err = store.save(&ws_id(), Version::MAX, &Snapshot::empty()).unwrap_err();
        assert!(matches!(err, StorageError::VersionOverflow(v) if v == Version::MAX));
        assert!(log.calls.lock().is_empty());
    }

    #[test]
    fn test_differs_from() {
        let base = snapshot(&[("/a.txt", "a"), ("/b.txt", "b")]);
        assert!(!base.differs_from(&base.clone()));
        assert!(base.differs_from(&snapshot(&[("/a.txt", "a")])));
        assert!(base.differs_from(&snapshot(&[("/a.txt", "a"), ("/b.txt", "B")])));
        assert!(base.differs_from(&snapshot(&[("/a.txt", "a"), ("/c.txt", "b")])));
    }

    #[test]
    fn test_fingerprint_ignores_entry_order() {
        let forward = vec![FileEntry::new("/a", "1"), FileEntry::new("/b", "2")];
        let backward = vec![FileEntry::new("/b", "2"), FileEntry::new("/a", "1")];
        assert_eq!(fingerprint_entries(&forward), fingerprint_entries(&backward));
        // length prefixes keep path/content boundaries distinct
        let shifted = vec![FileEntry::new("/a1", ""), FileEntry::new("/b", "2")];
        assert_ne!(fingerprint_entries(&forward), fingerprint_entries(&shifted));
    }
}
