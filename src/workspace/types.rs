//! Result DTOs for workspace commands (text and JSON output).

use crate::store::VersionInfo;
use crate::tree::FileNode;
use crate::types::Version;
use serde::Serialize;

/// Tree command result.
#[derive(Debug, Clone, Serialize)]
pub struct TreeOutput {
    pub workspace_id: String,
    pub version: Version,
    pub file_count: usize,
    pub roots: Vec<FileNode>,
}

/// One row of the listing table.
#[derive(Debug, Clone, Serialize)]
pub struct ListingRow {
    pub path: String,
    pub bytes: usize,
}

/// Listing command result.
#[derive(Debug, Clone, Serialize)]
pub struct ListingOutput {
    pub workspace_id: String,
    pub version: Version,
    pub rows: Vec<ListingRow>,
    pub total_bytes: usize,
}

/// Versions command result.
#[derive(Debug, Clone, Serialize)]
pub struct VersionsOutput {
    pub workspace_id: String,
    pub versions: Vec<VersionInfo>,
}
