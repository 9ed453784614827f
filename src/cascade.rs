//! Cascading rename and delete
//!
//! Folders have no entry of their own, so an operation on `/src` is applied to
//! `/src` itself and to every path beneath `/src/`. The engine trusts its
//! caller to have run [`crate::conflict`] checks first.
//!
//! Cascades are best-effort: a source whose content cannot be read is skipped
//! and reported while the remaining moves complete.

use crate::path;
use crate::workspace::EditableWorkspace;
use serde::Serialize;
use tracing::{debug, warn};

/// One path relocated by a rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Move {
    pub from: String,
    pub to: String,
}

/// Outcome of a cascading rename
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub applied: Vec<Move>,
    /// Moves dropped because their source content was missing
    pub skipped: Vec<Move>,
}

impl CascadeReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Paths affected by an operation on `target`, sorted
pub fn affected_paths<W>(workspace: &W, target: &str) -> Vec<String>
where
    W: EditableWorkspace + ?Sized,
{
    let mut paths: Vec<String> = workspace
        .list_paths()
        .into_iter()
        .filter(|p| path::is_same_or_descendant(p, target))
        .collect();
    paths.sort();
    paths
}

/// Remove `target` and everything nested beneath it; returns removed paths.
pub fn delete_cascade<W>(workspace: &mut W, target: &str) -> Vec<String>
where
    W: EditableWorkspace + ?Sized,
{
    let mut removed = Vec::new();
    for p in affected_paths(&*workspace, target) {
        if workspace.remove_path(&p) {
            removed.push(p);
        } else {
            warn!(path = %p, "path vanished before it could be deleted");
        }
    }
    debug!(path = target, count = removed.len(), "delete cascade applied");
    removed
}

/// Move `old` and everything nested beneath it to `new`, keeping content.
///
/// All sources are read before anything is written, so a destination that
/// overlaps a source (a case-only rename, for instance) is never lost.
pub fn rename_cascade<W>(workspace: &mut W, old: &str, new: &str) -> CascadeReport
where
    W: EditableWorkspace + ?Sized,
{
    let mut report = CascadeReport::default();
    if old == new {
        return report;
    }

    let mut planned = Vec::new();
    for from in affected_paths(&*workspace, old) {
        let to = path::rebase(&from, old, new);
        match workspace.get_content(&from) {
            Some(content) => planned.push((Move { from, to }, content)),
            None => {
                warn!(source = %from, destination = %to, "source content missing, move skipped");
                report.skipped.push(Move { from, to });
            }
        }
    }

    for (mv, _) in &planned {
        workspace.remove_path(&mv.from);
    }
    for (mv, content) in planned {
        workspace.set_content(&mv.to, content);
        report.applied.push(mv);
    }

    debug!(
        old,
        new,
        applied = report.applied.len(),
        skipped = report.skipped.len(),
        "rename cascade applied"
    );
    report
}
