//! Built-in defaults seeded into every builder.

use crate::config::{DEFAULT_FOLDER_PLACEHOLDER, DEFAULT_WORKSPACE_ID};
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};

/// Builder with defaults set; later sources override these keys.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("session.folder_placeholder", DEFAULT_FOLDER_PLACEHOLDER)?
        .set_default("session.confirm_deletes", true)?
        .set_default("session.default_workspace", DEFAULT_WORKSPACE_ID)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "file")
}
