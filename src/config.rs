//! Configuration System
//!
//! Layered launcher configuration: built-in defaults, the user-level file, the
//! workspace `.config` document and `LAUNCHPAD__*` environment overrides. The
//! document carries the task and application definitions used by the listings.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;
pub use sources::workspace_file::WORKSPACE_CONFIG_FILE;

/// Task definition (name/label/icon record)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
}

impl TaskDefinition {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            icon: None,
            group: None,
        }
    }
}

/// Application definition (executable/args/label record)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDefinition {
    /// Action name; defaults to the executable's file stem
    #[serde(default)]
    pub name: Option<String>,
    pub executable: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub order: i32,
    /// Extra launch environment; values may reference OS variables as `{VAR}`
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
}

impl AppDefinition {
    pub fn action_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => Path::new(&self.executable)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.executable.clone()),
        }
    }
}

/// Per-project configuration carried by project documents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub tasks: Vec<TaskDefinition>,
    #[serde(default)]
    pub apps: Vec<AppDefinition>,
    /// Path templates such as `work`, formatted against the frame environment
    #[serde(default)]
    pub template: BTreeMap<String, String>,
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherConfig {
    /// Studio label shown in the title
    #[serde(default)]
    pub label: Option<String>,

    /// Projects root; falls back to `LAUNCHPAD_PROJECTS`
    #[serde(default)]
    pub projects_root: Option<PathBuf>,

    /// Default task definitions for projects without their own
    #[serde(default)]
    pub tasks: Vec<TaskDefinition>,

    /// Default application definitions for projects without their own
    #[serde(default)]
    pub apps: Vec<AppDefinition>,

    /// Silo directories recognised by the filesystem store
    #[serde(default = "default_silos")]
    pub silos: Vec<String>,

    /// Extra environment variables that must be present at startup
    #[serde(default)]
    pub required_environment: Vec<String>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

pub(crate) fn default_silos() -> Vec<String> {
    vec!["assets".to_string(), "film".to_string()]
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            label: None,
            projects_root: None,
            tasks: Vec::new(),
            apps: Vec::new(),
            silos: default_silos(),
            required_environment: Vec::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl LauncherConfig {
    /// Project configuration used when a project document carries none.
    pub fn project_defaults(&self) -> ProjectConfig {
        ProjectConfig {
            tasks: self.tasks.clone(),
            apps: self.apps.clone(),
            template: BTreeMap::new(),
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let mut task_names = HashSet::new();
        for task in &self.tasks {
            if task.name.trim().is_empty() {
                errors.push(ValidationError::Task(
                    task.name.clone(),
                    "Task name cannot be empty".to_string(),
                ));
            } else if !task_names.insert(task.name.as_str()) {
                errors.push(ValidationError::Task(
                    task.name.clone(),
                    "Duplicate task name".to_string(),
                ));
            }
        }

        let mut app_names = HashSet::new();
        for app in &self.apps {
            let name = app.action_name();
            if app.executable.trim().is_empty() {
                errors.push(ValidationError::App(
                    name.clone(),
                    "Executable cannot be empty".to_string(),
                ));
            }
            if !app_names.insert(name.clone()) {
                errors.push(ValidationError::App(name, "Duplicate app name".to_string()));
            }
        }

        if self.silos.iter().any(|silo| silo.trim().is_empty()) {
            errors.push(ValidationError::System(
                "Silo names cannot be empty".to_string(),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Task(String, String),
    App(String, String),
    System(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Task(name, msg) => write!(f, "Task '{}': {}", name, msg),
            ValidationError::App(name, msg) => write!(f, "App '{}': {}", name, msg),
            ValidationError::System(msg) => write!(f, "System: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Fold validation errors into a single configuration error.
pub fn validation_failure(errors: &[ValidationError]) -> ApiError {
    let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    ApiError::ConfigError(format!(
        "Configuration validation failed:\n{}",
        error_msgs.join("\n")
    ))
}
