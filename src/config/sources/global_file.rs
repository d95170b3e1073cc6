//! Global config file source: $XDG_CONFIG_HOME/launchpad/config.json

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

/// Path to the user-level config file.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "launchpad").map(|dirs| dirs.config_dir().join("config.json"))
}

/// Add the global config file source to the builder if it exists.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if let Some(path) = global_config_path() {
        if path.is_file() {
            let canonical = dunce::canonicalize(&path).unwrap_or_else(|_| path.clone());
            builder = builder.add_source(
                File::from(canonical)
                    .format(FileFormat::Json)
                    .required(false),
            );
        } else {
            debug!(config_path = %path.display(), "No user-level configuration file");
        }
    }
    Ok(builder)
}
