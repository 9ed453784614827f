//! Optional global config file: `$XDG_CONFIG_HOME/sandtree/config.toml`

use crate::config::xdg;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};

/// Add the global file when it can be located; a missing file is fine.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match xdg::global_config_path() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "Global config source");
            Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(false)))
        }
        Err(_) => Ok(builder),
    }
}
