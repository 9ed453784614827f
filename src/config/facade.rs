//! ConfigLoader facade delegating to the merge service.

use super::merge::service::MergeService;
use super::SandtreeConfig;
use crate::error::ApiError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file and environment.
    pub fn load() -> Result<SandtreeConfig, ApiError> {
        let config = MergeService::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file, with the environment on top.
    pub fn load_from_file(path: &Path) -> Result<SandtreeConfig, ApiError> {
        if !path.is_file() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let config = MergeService::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Pick `load_from_file` when an explicit path is given.
    pub fn load_with(path: Option<&Path>) -> Result<SandtreeConfig, ApiError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }

    /// Create default configuration.
    pub fn default() -> SandtreeConfig {
        SandtreeConfig::default()
    }
}
