use std::sync::Arc;

use sandtree::config::SessionConfig;
use sandtree::error::ApiError;
use sandtree::notify::{Operation, RecordingSink};
use sandtree::store::{MemorySnapshotStore, VersionedSnapshotStore};
use sandtree::types::{EntryKind, FileEntry, WorkspaceId};
use sandtree::workspace::{EditableWorkspace, InMemoryWorkspace, WorkspaceSession};

fn seeded_store(entries: &[(&str, &str)]) -> (VersionedSnapshotStore, WorkspaceId) {
    let id = WorkspaceId::new("site").unwrap();
    let store = VersionedSnapshotStore::new(Arc::new(MemorySnapshotStore::new()));
    let snapshot = sandtree::store::Snapshot::from_entries(
        entries.iter().map(|(p, c)| FileEntry::new(*p, *c)),
    );
    store.save(&id, 0, &snapshot).unwrap();
    (store, id)
}

fn open(
    store: &VersionedSnapshotStore,
    id: &WorkspaceId,
    version: u64,
    sink: Arc<RecordingSink>,
) -> WorkspaceSession<InMemoryWorkspace> {
    WorkspaceSession::open(
        id.clone(),
        version,
        InMemoryWorkspace::new(),
        store.clone(),
        sink,
        SessionConfig::default(),
    )
    .unwrap()
}

#[test]
fn edit_save_reopen_next_version() {
    let (store, id) = seeded_store(&[("/index.js", "main"), ("/utils.js", "util")]);
    let sink = Arc::new(RecordingSink::new());
    let mut session = open(&store, &id, 1, Arc::clone(&sink));

    let err = session
        .create("/Index.js", EntryKind::File, None)
        .unwrap_err();
    assert!(matches!(err, ApiError::PathExists { .. }));

    session.rename("/utils.js", "/lib/utils.js").unwrap();
    assert_eq!(session.paths(), vec!["/index.js", "/lib/utils.js"]);

    session.delete("/lib").unwrap();
    assert_eq!(session.paths(), vec!["/index.js"]);
    assert!(session.has_unsaved_changes());

    let report = session.save().unwrap();
    assert_eq!((report.version, report.next_version), (1, 2));
    assert!(!session.has_unsaved_changes());

    let reopened = open(&store, &id, 2, Arc::new(RecordingSink::new()));
    assert_eq!(reopened.paths(), vec!["/index.js"]);
    assert_eq!(reopened.read("/index.js").unwrap(), "main");

    let ops: Vec<(Operation, bool)> = sink
        .notifications()
        .iter()
        .map(|n| (n.operation, n.success))
        .collect();
    assert_eq!(
        ops,
        vec![
            (Operation::Create, false),
            (Operation::Rename, true),
            (Operation::Delete, true),
            (Operation::Save, true),
        ]
    );
}

#[test]
fn folder_rename_carries_content() {
    let (store, id) = seeded_store(&[("/old/a.ts", "X"), ("/old/b/c.ts", "Y")]);
    let mut session = open(&store, &id, 0, Arc::new(RecordingSink::new()));

    session.create("/old/b/d.ts", EntryKind::File, Some("Z".into())).unwrap();
    assert_eq!(session.workspace().active_path(), Some("/old/b/d.ts"));

    let report = session.rename("/old", "/new").unwrap();
    assert!(report.is_complete());
    assert_eq!(report.applied.len(), 3);

    let files = session.workspace().files().clone();
    let expected: Vec<(&str, &str)> = vec![("/new/a.ts", "X"), ("/new/b/c.ts", "Y"), ("/new/b/d.ts", "Z")];
    assert_eq!(
        files.iter().map(|(p, c)| (p.as_str(), c.as_str())).collect::<Vec<_>>(),
        expected
    );
}

#[test]
fn tree_reflects_every_mutation() {
    let (store, id) = seeded_store(&[]);
    let mut session = open(&store, &id, 0, Arc::new(RecordingSink::new()));
    assert!(session.tree().is_empty());

    session.create("/docs", EntryKind::Folder, None).unwrap();
    session.create("/readme.md", EntryKind::File, None).unwrap();
    let names: Vec<&str> = session.tree().iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["docs", "readme.md"]);

    let err = session.create("/docs", EntryKind::Folder, None).unwrap_err();
    assert!(matches!(err, ApiError::FolderConflict { .. }));

    session.delete("/docs").unwrap();
    let names: Vec<&str> = session.tree().iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["readme.md"]);
}

#[test]
fn failed_save_keeps_edits() {
    let backend = Arc::new(MemorySnapshotStore::new());
    let store = VersionedSnapshotStore::new(backend.clone());
    let id = WorkspaceId::new("site").unwrap();
    let sink = Arc::new(RecordingSink::new());
    let mut session = open(&store, &id, 0, Arc::clone(&sink));

    session.create("/a.txt", EntryKind::File, Some("a".into())).unwrap();
    backend.set_fail_writes(true);
    let err = session.save().unwrap_err();
    assert!(matches!(err, ApiError::PersistenceFailure(_)));
    assert!(err.to_string().starts_with("Saving failed; your edits are kept, please retry"));
    assert!(session.has_unsaved_changes());
    assert_eq!(session.read("/a.txt").unwrap(), "a");

    backend.set_fail_writes(false);
    session.save().unwrap();
    assert!(!session.has_unsaved_changes());
    let last = sink.last().unwrap();
    assert!(last.success);
}

#[test]
fn saving_twice_persists_same_content() {
    let (store, id) = seeded_store(&[("/a.txt", "a")]);
    let mut session = open(&store, &id, 1, Arc::new(RecordingSink::new()));
    let first = session.save().unwrap();
    let second = session.save().unwrap();
    assert_eq!(first.fingerprint, second.fingerprint);
    assert_eq!(
        store.load(&id, 1).unwrap().unwrap(),
        store.load(&id, 2).unwrap().unwrap()
    );
}

#[test]
fn custom_workspace_implementation() {
    #[derive(Default)]
    struct Counting {
        inner: InMemoryWorkspace,
        writes: usize,
    }

    impl EditableWorkspace for Counting {
        fn list_paths(&self) -> Vec<String> {
            self.inner.list_paths()
        }
        fn get_content(&self, path: &str) -> Option<String> {
            self.inner.get_content(path)
        }
        fn set_content(&mut self, path: &str, content: String) {
            self.writes += 1;
            self.inner.set_content(path, content);
        }
        fn remove_path(&mut self, path: &str) -> bool {
            self.inner.remove_path(path)
        }
        fn set_active_path(&mut self, path: Option<&str>) {
            self.inner.set_active_path(path);
        }
    }

    let (store, id) = seeded_store(&[("/src/a.ts", "a"), ("/src/b.ts", "b")]);
    let mut session = WorkspaceSession::open(
        id,
        0,
        Counting::default(),
        store,
        Arc::new(RecordingSink::new()),
        SessionConfig::default(),
    )
    .unwrap();
    session.rename("/src", "/lib").unwrap();
    let workspace = session.into_workspace();
    assert_eq!(workspace.writes, 4);
    assert_eq!(workspace.inner.len(), 2);
}
