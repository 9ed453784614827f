//! In-memory editable workspace backed by an ordered map.

use crate::types::FileEntry;
use crate::workspace::editable::EditableWorkspace;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkspace {
    files: BTreeMap<String, String>,
    active: Option<String>,
}

impl InMemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = FileEntry>,
    {
        Self {
            files: entries.into_iter().map(|e| (e.path, e.content)).collect(),
            active: None,
        }
    }

    pub fn active_path(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Borrow the underlying map, ordered by path
    pub fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }
}

impl EditableWorkspace for InMemoryWorkspace {
    fn list_paths(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    fn get_content(&self, path: &str) -> Option<String> {
        self.files.get(path).cloned()
    }

    fn set_content(&mut self, path: &str, content: String) {
        self.files.insert(path.to_string(), content);
    }

    fn remove_path(&mut self, path: &str) -> bool {
        let removed = self.files.remove(path).is_some();
        if removed && self.active.as_deref() == Some(path) {
            self.active = None;
        }
        removed
    }

    fn set_active_path(&mut self, path: Option<&str>) {
        self.active = path.map(str::to_string);
    }
}
