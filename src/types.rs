//! Core types for the virtual workspace file tree.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Version: snapshot identifier within a workspace
pub type Version = u64;

/// Fingerprint: blake3 digest of a snapshot
pub type Fingerprint = [u8; 32];

/// Kind of entry a path names in the derived tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Folder => write!(f, "folder"),
        }
    }
}

/// A single stored file: its `/`-rooted path and text content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub content: String,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Identifier of a workspace in the persistent store.
///
/// Used as a key prefix, so it may not be empty and may not contain `/` or NUL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkspaceId(String);

impl WorkspaceId {
    pub fn new(id: impl Into<String>) -> Result<Self, ApiError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ApiError::InvalidWorkspaceId {
                id,
                reason: "must not be empty".to_string(),
            });
        }
        if id.contains('\0') || id.contains('/') {
            return Err(ApiError::InvalidWorkspaceId {
                id,
                reason: "must not contain '/' or NUL".to_string(),
            });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for WorkspaceId {
    type Error = ApiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        WorkspaceId::new(value)
    }
}

impl From<WorkspaceId> for String {
    fn from(id: WorkspaceId) -> Self {
        id.0
    }
}
