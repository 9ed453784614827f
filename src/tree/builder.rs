//! Path set to tree projection
//!
//! Turns an unordered set of `/`-rooted paths into sorted root nodes. At every
//! level folders come before files, and each group is ordered by
//! case-sensitive name.
//!
//! A name used both as a file and as a folder (`/a` and `/a/b`) resolves to a
//! folder, whichever path arrives first.

use crate::path;
use crate::tree::node::FileNode;
use crate::types::EntryKind;
use std::collections::BTreeMap;

#[derive(Default)]
struct Draft {
    folder: bool,
    children: BTreeMap<String, Draft>,
}

/// Build the display tree for a set of paths
pub fn build_tree<I, S>(paths: I) -> Vec<FileNode>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut root: BTreeMap<String, Draft> = BTreeMap::new();

    for p in paths {
        let segments: Vec<&str> = path::segments(p.as_ref())
            .filter(|s| !s.is_empty())
            .collect();
        let Some((last, parents)) = segments.split_last() else {
            continue;
        };

        let mut level = &mut root;
        for segment in parents {
            let draft = level.entry((*segment).to_string()).or_default();
            draft.folder = true;
            level = &mut draft.children;
        }
        // a file never demotes an existing folder
        level.entry((*last).to_string()).or_default();
    }

    finish(root, "")
}

fn finish(level: BTreeMap<String, Draft>, parent: &str) -> Vec<FileNode> {
    let mut folders = Vec::new();
    let mut files = Vec::new();
    for (name, draft) in level {
        let node_path = path::join(parent, &name);
        if draft.folder || !draft.children.is_empty() {
            let children = finish(draft.children, &node_path);
            folders.push(FileNode::folder(name, node_path, children));
        } else {
            files.push(FileNode {
                name,
                path: node_path,
                kind: EntryKind::File,
                children: None,
            });
        }
    }
    folders.extend(files);
    folders
}
