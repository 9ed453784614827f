//! Derived tree node types

use crate::types::EntryKind;
use serde::{Deserialize, Serialize};

/// A file or folder in the derived tree.
///
/// Folders carry `Some(children)`, files carry `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
}

impl FileNode {
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::File,
            children: None,
        }
    }

    pub fn folder(name: impl Into<String>, path: impl Into<String>, children: Vec<FileNode>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::Folder,
            children: Some(children),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }

    pub fn children(&self) -> &[FileNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Find the node at `path` within this subtree
    pub fn find(&self, path: &str) -> Option<&FileNode> {
        if self.path == path {
            return Some(self);
        }
        if !crate::path::is_descendant_of(path, &self.path) {
            return None;
        }
        self.children().iter().find_map(|child| child.find(path))
    }

    /// Number of file leaves in this subtree
    pub fn count_files(&self) -> usize {
        match self.kind {
            EntryKind::File => 1,
            EntryKind::Folder => self.children().iter().map(FileNode::count_files).sum(),
        }
    }
}

/// Find a node anywhere in a forest of roots
pub fn find_in<'a>(roots: &'a [FileNode], path: &str) -> Option<&'a FileNode> {
    roots.iter().find_map(|root| root.find(path))
}

/// Render roots as an indented listing, folders suffixed with `/`.
pub fn render_tree(roots: &[FileNode]) -> String {
    render_tree_with(roots, |label| label.to_string())
}

/// [`render_tree`] with folder labels (`name/`) passed through `folder_label`.
pub fn render_tree_with<F>(roots: &[FileNode], folder_label: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut out = String::new();
    for root in roots {
        render_node(root, 0, &folder_label, &mut out);
    }
    out
}

fn render_node<F>(node: &FileNode, depth: usize, folder_label: &F, out: &mut String)
where
    F: Fn(&str) -> String,
{
    out.push_str(&"  ".repeat(depth));
    if node.is_folder() {
        out.push_str(&folder_label(&format!("{}/", node.name)));
    } else {
        out.push_str(&node.name);
    }
    out.push('\n');
    for child in node.children() {
        render_node(child, depth + 1, folder_label, out);
    }
}
