use std::sync::Arc;

use sandtree::store::{SledSnapshotStore, Snapshot, SnapshotStore, VersionedSnapshotStore};
use sandtree::types::{FileEntry, WorkspaceId};
use tempfile::TempDir;

fn snapshot(entries: &[(&str, &str)]) -> Snapshot {
    Snapshot::from_entries(entries.iter().map(|(p, c)| FileEntry::new(*p, *c)))
}

#[test]
fn save_mirrors_into_next_version() {
    let temp_dir = TempDir::new().unwrap();
    let backend = Arc::new(SledSnapshotStore::open(&temp_dir.path().join("store")).unwrap());
    let store = VersionedSnapshotStore::new(backend);
    let id = WorkspaceId::new("site").unwrap();

    let first = snapshot(&[("/index.js", "main"), ("/lib/utils.js", "util")]);
    store.save(&id, 4, &first).unwrap();

    assert_eq!(store.load(&id, 4).unwrap().unwrap(), first);
    assert_eq!(store.load(&id, 5).unwrap().unwrap(), first);
    assert_eq!(store.load(&id, 3).unwrap(), None);
    assert_eq!(store.latest_version(&id).unwrap(), Some(5));
}

#[test]
fn resave_replaces_rather_than_merges() {
    let temp_dir = TempDir::new().unwrap();
    let backend = Arc::new(SledSnapshotStore::open(temp_dir.path()).unwrap());
    let store = VersionedSnapshotStore::new(backend);
    let id = WorkspaceId::new("site").unwrap();

    store.save(&id, 0, &snapshot(&[("/a.txt", "a"), ("/b.txt", "b")])).unwrap();
    store.save(&id, 1, &snapshot(&[("/b.txt", "b2")])).unwrap();

    let v0 = store.load(&id, 0).unwrap().unwrap();
    let v1 = store.load(&id, 1).unwrap().unwrap();
    let v2 = store.load(&id, 2).unwrap().unwrap();
    assert_eq!(v0.len(), 2);
    assert_eq!(v1, v2);
    assert_eq!(v1.get("/b.txt"), Some("b2"));
    assert_eq!(v1.get("/a.txt"), None);

    let versions = store.versions(&id).unwrap();
    let numbers: Vec<u64> = versions.iter().map(|v| v.version).collect();
    assert_eq!(numbers, vec![0, 1, 2]);
    assert_eq!(versions[2].manifest.entry_count, 1);
}

#[test]
fn empty_save_is_distinct_from_never_saved() {
    let temp_dir = TempDir::new().unwrap();
    let backend = Arc::new(SledSnapshotStore::open(temp_dir.path()).unwrap());
    let store = VersionedSnapshotStore::new(backend);
    let id = WorkspaceId::new("site").unwrap();

    store.save(&id, 0, &Snapshot::empty()).unwrap();
    assert_eq!(store.load(&id, 1).unwrap(), Some(Snapshot::empty()));
    assert_eq!(store.load(&id, 2).unwrap(), None);
}

#[test]
fn workspaces_are_isolated() {
    let temp_dir = TempDir::new().unwrap();
    let backend = SledSnapshotStore::open(temp_dir.path()).unwrap();
    let site = WorkspaceId::new("site").unwrap();
    let site2 = WorkspaceId::new("site2").unwrap();

    backend
        .create_batch(&site, 0, &[FileEntry::new("/a.txt", "a")])
        .unwrap();
    backend
        .create_batch(&site2, 0, &[FileEntry::new("/b.txt", "b")])
        .unwrap();

    let loaded = backend.load_version(&site, 0).unwrap().unwrap();
    assert_eq!(loaded, vec![FileEntry::new("/a.txt", "a")]);
    assert_eq!(backend.list_versions(&site).unwrap().len(), 1);

    backend.delete_all_for_version(&site, 0).unwrap();
    assert_eq!(backend.load_version(&site, 0).unwrap(), None);
    assert!(backend.load_version(&site2, 0).unwrap().is_some());
}
