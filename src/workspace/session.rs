//! Editing session
//!
//! Owns one editable workspace for the lifetime of an editing session and
//! routes every action through validation, the cascade engine and the tree
//! projection. Saving is the only step that reaches the persistent store.

use crate::cascade::{self, CascadeReport};
use crate::config::SessionConfig;
use crate::conflict;
use crate::error::ApiError;
use crate::notify::{Notification, NotificationSink, Operation};
use crate::path;
use crate::store::{SaveReport, Snapshot, VersionedSnapshotStore};
use crate::tree::{build_tree, FileNode};
use crate::types::{EntryKind, Version, WorkspaceId};
use crate::workspace::editable::EditableWorkspace;
use std::sync::Arc;
use tracing::{info, warn};

pub struct WorkspaceSession<W: EditableWorkspace> {
    id: WorkspaceId,
    version: Version,
    workspace: W,
    baseline: Snapshot,
    tree: Vec<FileNode>,
    store: VersionedSnapshotStore,
    sink: Arc<dyn NotificationSink>,
    config: SessionConfig,
}

impl<W: EditableWorkspace> WorkspaceSession<W> {
    /// Start a session on `version`, loading its saved snapshot into `workspace`.
    ///
    /// Whatever `workspace` already held is discarded first. A version that
    /// was never saved starts empty.
    pub fn open(
        id: WorkspaceId,
        version: Version,
        mut workspace: W,
        store: VersionedSnapshotStore,
        sink: Arc<dyn NotificationSink>,
        config: SessionConfig,
    ) -> Result<Self, ApiError> {
        let baseline = store.load(&id, version)?.unwrap_or_default();
        for stale in workspace.list_paths() {
            workspace.remove_path(&stale);
        }
        workspace.set_active_path(None);
        baseline.restore_into(&mut workspace);
        info!(%id, version, files = baseline.len(), "session opened");

        let mut session = Self {
            id,
            version,
            workspace,
            baseline,
            tree: Vec::new(),
            store,
            sink,
            config,
        };
        session.refresh_tree();
        Ok(session)
    }

    pub fn id(&self) -> &WorkspaceId {
        &self.id
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn workspace(&self) -> &W {
        &self.workspace
    }

    pub fn into_workspace(self) -> W {
        self.workspace
    }

    /// Display tree for the current file set
    pub fn tree(&self) -> &[FileNode] {
        &self.tree
    }

    pub fn paths(&self) -> Vec<String> {
        let mut paths = self.workspace.list_paths();
        paths.sort();
        paths
    }

    pub fn read(&self, path: &str) -> Result<String, ApiError> {
        self.workspace
            .get_content(path)
            .ok_or_else(|| ApiError::NotFound(path.to_string()))
    }

    /// What `path` names right now: a stored file, a synthesized folder, or nothing
    pub fn kind_of(&self, path: &str) -> Option<EntryKind> {
        let paths = self.workspace.list_paths();
        if paths.iter().any(|p| p == path) {
            Some(EntryKind::File)
        } else if paths.iter().any(|p| path::is_descendant_of(p, path)) {
            Some(EntryKind::Folder)
        } else {
            None
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.workspace)
    }

    /// Compare the live file set against the last loaded or saved snapshot
    pub fn has_unsaved_changes(&self) -> bool {
        self.snapshot().differs_from(&self.baseline)
    }

    /// Create a file (optionally with content) or a folder.
    ///
    /// Folders are materialized through the configured placeholder file, since
    /// the map only stores files.
    pub fn create(
        &mut self,
        target: &str,
        kind: EntryKind,
        content: Option<String>,
    ) -> Result<(), ApiError> {
        let result = self.create_inner(target, kind, content);
        self.announce(Operation::Create, &result, || format!("Created {} {}", kind, target));
        result
    }

    fn create_inner(
        &mut self,
        target: &str,
        kind: EntryKind,
        content: Option<String>,
    ) -> Result<(), ApiError> {
        conflict::can_create(&self.workspace.list_paths(), target, kind)?;
        match kind {
            EntryKind::File => {
                self.workspace
                    .set_content(target, content.unwrap_or_default());
                self.workspace.set_active_path(Some(target));
            }
            EntryKind::Folder => {
                let placeholder = path::join(target, &self.config.folder_placeholder);
                path::validate(&placeholder)?;
                self.workspace.set_content(&placeholder, String::new());
            }
        }
        self.refresh_tree();
        Ok(())
    }

    /// Replace the content of an existing file
    pub fn write(&mut self, target: &str, content: String) -> Result<(), ApiError> {
        let result = match self.workspace.get_content(target) {
            Some(_) => {
                self.workspace.set_content(target, content);
                Ok(())
            }
            None => Err(ApiError::NotFound(target.to_string())),
        };
        self.announce(Operation::Write, &result, || format!("Updated {}", target));
        result
    }

    /// Rename a file or folder, moving everything nested beneath it
    pub fn rename(&mut self, old: &str, new: &str) -> Result<CascadeReport, ApiError> {
        let result = self.rename_inner(old, new);
        self.announce(Operation::Rename, &result, || match &result {
            Ok(report) if !report.is_complete() => format!(
                "Renamed {} to {} ({} item(s) could not be moved)",
                old,
                new,
                report.skipped.len()
            ),
            _ => format!("Renamed {} to {}", old, new),
        });
        result
    }

    fn rename_inner(&mut self, old: &str, new: &str) -> Result<CascadeReport, ApiError> {
        let kind = self
            .kind_of(old)
            .ok_or_else(|| ApiError::NotFound(old.to_string()))?;
        conflict::can_rename(&self.workspace.list_paths(), old, new, kind)?;

        let report = cascade::rename_cascade(&mut self.workspace, old, new);
        if kind == EntryKind::File && !report.applied.is_empty() {
            self.workspace.set_active_path(Some(new));
        }
        for skipped in &report.skipped {
            warn!(
                error = %ApiError::SourceMissing(skipped.from.clone()),
                "rename skipped one path"
            );
        }
        self.refresh_tree();
        Ok(report)
    }

    /// Delete a file, or a folder and everything beneath it
    pub fn delete(&mut self, target: &str) -> Result<Vec<String>, ApiError> {
        let result = self.delete_inner(target);
        self.announce(Operation::Delete, &result, || match &result {
            Ok(removed) if removed.len() > 1 => {
                format!("Deleted {} ({} files)", target, removed.len())
            }
            _ => format!("Deleted {}", target),
        });
        result
    }

    fn delete_inner(&mut self, target: &str) -> Result<Vec<String>, ApiError> {
        path::validate(target)?;
        if cascade::affected_paths(&self.workspace, target).is_empty() {
            return Err(ApiError::NotFound(target.to_string()));
        }
        let removed = cascade::delete_cascade(&mut self.workspace, target);
        self.refresh_tree();
        Ok(removed)
    }

    /// Persist the current file set as this version and the next.
    ///
    /// On failure the live file set is left as is and the session keeps
    /// reporting unsaved changes.
    pub fn save(&mut self) -> Result<SaveReport, ApiError> {
        let snapshot = self.snapshot();
        match self.store.save(&self.id, self.version, &snapshot) {
            Ok(report) => {
                self.baseline = snapshot;
                self.sink.notify(&Notification::success(
                    Operation::Save,
                    format!(
                        "Saved {} file(s) as versions {} and {}",
                        report.entry_count, report.version, report.next_version
                    ),
                ));
                Ok(report)
            }
            Err(err) => {
                warn!(id = %self.id, version = self.version, error = %err, "save failed");
                let err = ApiError::PersistenceFailure(err);
                self.sink
                    .notify(&Notification::failure(Operation::Save, err.to_string()));
                Err(err)
            }
        }
    }

    fn refresh_tree(&mut self) {
        self.tree = build_tree(self.workspace.list_paths());
    }

    fn announce<T>(
        &self,
        operation: Operation,
        result: &Result<T, ApiError>,
        success: impl FnOnce() -> String,
    ) {
        let notification = match result {
            Ok(_) => Notification::success(operation, success()),
            Err(err) => Notification::failure(operation, err.to_string()),
        };
        self.sink.notify(&notification);
    }
}
