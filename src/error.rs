//! Error types
//!
//! `ApiError` covers workspace operations and the CLI surface. `StorageError`
//! covers the snapshot store; a failed save surfaces as
//! `ApiError::PersistenceFailure`, any other store failure as `ApiError::Storage`.

use crate::types::Version;
use thiserror::Error;

/// Snapshot store errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Version {0} has no successor")]
    VersionOverflow(Version),

    #[error("Corrupt record under key {key}: {reason}")]
    CorruptRecord { key: String, reason: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<bincode::Error> for StorageError {
    fn from(err: bincode::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Workspace operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("'{path}' already exists (as '{existing}')")]
    PathExists { path: String, existing: String },

    #[error("'{path}' conflicts with existing path '{conflicting}'")]
    FolderConflict { path: String, conflicting: String },

    #[error("Content for '{0}' could not be read")]
    SourceMissing(String),

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Cannot move folder '{from}' into itself ('{to}')")]
    MoveIntoSelf { from: String, to: String },

    #[error("Nothing found at '{0}'")]
    NotFound(String),

    #[error("Invalid workspace id '{id}': {reason}")]
    InvalidWorkspaceId { id: String, reason: String },

    #[error("Saving failed; your edits are kept, please retry ({0})")]
    PersistenceFailure(StorageError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Could not read input '{path}': {reason}")]
    InputError { path: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl ApiError {
    /// True for errors raised before any mutation was attempted
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ApiError::PathExists { .. }
                | ApiError::FolderConflict { .. }
                | ApiError::InvalidPath { .. }
                | ApiError::MoveIntoSelf { .. }
                | ApiError::NotFound(_)
        )
    }
}
