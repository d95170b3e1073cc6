//! Workspace config file source: `<root>/.config` (JSON).

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::Path;

/// File name of the workspace configuration document.
pub const WORKSPACE_CONFIG_FILE: &str = ".config";

/// Add the workspace config document to the builder.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = root.join(WORKSPACE_CONFIG_FILE);
    if !path.is_file() {
        return Ok(builder);
    }
    Ok(builder.add_source(File::from(path).format(FileFormat::Json).required(false)))
}
