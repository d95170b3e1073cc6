//! Config loader facade: layered loading of the launcher configuration.

use crate::config::merge::merge_policy;
use crate::config::sources::{global_file, workspace_file};
use crate::config::LauncherConfig;
use config::{ConfigError, Environment, File, FileFormat};
use std::path::Path;
use tracing::debug;

/// Loads [`LauncherConfig`] from its sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace root.
    ///
    /// Precedence (lowest to highest): defaults, user-level file, `<root>/.config`,
    /// `LAUNCHPAD__*` environment variables.
    pub fn load(root: &Path) -> Result<LauncherConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, root)?;
        let builder = builder.add_source(Environment::with_prefix("LAUNCHPAD").separator("__"));

        let config: LauncherConfig = builder.build()?.try_deserialize()?;
        debug!(
            root = %root.display(),
            tasks = config.tasks.len(),
            apps = config.apps.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Load configuration from a single JSON file, on top of the defaults only.
    pub fn load_from_file(path: &Path) -> Result<LauncherConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path).format(FileFormat::Json))
            .build()?
            .try_deserialize()
    }

    /// Defaults only.
    pub fn default() -> LauncherConfig {
        LauncherConfig::default()
    }
}
