//! Sandtree: a virtual workspace file tree
//!
//! Files live in a flat map of absolute paths to contents. Folders are never
//! stored; they are derived from path prefixes whenever the tree is built.
//! Edits go through case-insensitive conflict checks and cascade over every
//! nested path, and each save writes the snapshot as both the current and the
//! next version.

pub mod cascade;
pub mod config;
pub mod conflict;
pub mod error;
pub mod logging;
pub mod notify;
pub mod path;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod workspace;
