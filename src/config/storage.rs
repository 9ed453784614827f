//! StorageConfig and store path resolution.

use crate::config::xdg;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Snapshot database directory; None means `$XDG_DATA_HOME/sandtree/store`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the snapshot database directory.
    pub fn resolve_store_path(&self) -> Result<PathBuf, ApiError> {
        match &self.store_path {
            Some(path) if !path.as_os_str().is_empty() => Ok(path.clone()),
            _ => Ok(xdg::data_dir()?.join("store")),
        }
    }
}
