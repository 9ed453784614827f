//! Workspace Tree
//!
//! Display projection of the flat path map. The tree is derived on demand from
//! the current path set and never edited in place.

pub mod builder;
pub mod node;

pub use builder::build_tree;
pub use node::{find_in, render_tree, render_tree_with, FileNode};
