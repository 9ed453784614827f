//! MergeService: orchestrates sources, applies defaults, deserializes to SandtreeConfig.

use crate::config::sources::{environment, global_file};
use crate::config::SandtreeConfig;
use config::{ConfigError, File, FileFormat};
use std::path::Path;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> global file -> environment (highest).
    pub fn load() -> Result<SandtreeConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = environment::add_to_builder(builder)?;
        builder.build()?.try_deserialize()
    }

    /// Precedence: defaults (lowest) -> given file -> environment (highest).
    ///
    /// The global file is skipped when an explicit file is given.
    pub fn load_from_file(path: &Path) -> Result<SandtreeConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        let builder = environment::add_to_builder(builder)?;
        builder.build()?.try_deserialize()
    }
}
