//! Configuration
//!
//! Layered settings: built-in defaults, the global config file, an explicit
//! `--config` file, then `SANDTREE__SECTION__KEY` environment variables.

mod facade;
mod merge;
mod paths;
mod sources;
mod storage;

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use storage::StorageConfig;

pub(crate) const DEFAULT_FOLDER_PLACEHOLDER: &str = ".gitkeep";
pub(crate) const DEFAULT_WORKSPACE_ID: &str = "default";

fn default_folder_placeholder() -> String {
    DEFAULT_FOLDER_PLACEHOLDER.to_string()
}

fn default_workspace_id() -> String {
    DEFAULT_WORKSPACE_ID.to_string()
}

fn default_true() -> bool {
    true
}

/// Editing session behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// File written inside a newly created folder so the folder exists in the map
    #[serde(default = "default_folder_placeholder")]
    pub folder_placeholder: String,

    /// Ask before cascading deletes from the CLI
    #[serde(default = "default_true")]
    pub confirm_deletes: bool,

    /// Workspace used when `--workspace-id` is not given
    #[serde(default = "default_workspace_id")]
    pub default_workspace: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            folder_placeholder: default_folder_placeholder(),
            confirm_deletes: default_true(),
            default_workspace: default_workspace_id(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SandtreeConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

impl SandtreeConfig {
    /// Reject settings the session cannot work with
    pub fn validate(&self) -> Result<(), ApiError> {
        let placeholder = &self.session.folder_placeholder;
        if placeholder.is_empty() || placeholder.contains('/') || placeholder == "." || placeholder == ".." {
            return Err(ApiError::ConfigError(format!(
                "session.folder_placeholder must be a plain file name, got '{}'",
                placeholder
            )));
        }
        crate::types::WorkspaceId::new(self.session.default_workspace.clone())?;
        Ok(())
    }

    /// Effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, ApiError> {
        toml::to_string_pretty(self)
            .map_err(|e| ApiError::ConfigError(format!("Failed to serialize config: {}", e)))
    }
}
