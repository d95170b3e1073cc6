//! Error types for the launcher.

use crate::types::ProcessId;
use std::path::PathBuf;
use thiserror::Error;

/// Document-store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store root is not a directory: {0}")]
    InvalidRoot(PathBuf),

    #[error("Malformed document: {0}")]
    Malformed(String),
}

/// Navigation and action-registry errors
///
/// These are recovered at the navigator boundary: the stack is left untouched
/// and the frontend reports the message.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("Invalid selection '{selection}' in {scope}")]
    InvalidSelection { selection: String, scope: String },

    #[error("Cannot descend below task '{0}'")]
    AtLeaf(String),

    #[error("No action found: {0}")]
    ActionNotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Launch error: {0}")]
    Launch(#[from] LaunchError),
}

/// Process launch and supervision errors
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("'{0}' was not found")]
    ExecutableNotFound(String),

    #[error("Failed to spawn '{executable}': {source}")]
    SpawnError {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Process not found: #{0}")]
    ProcessNotFound(ProcessId),

    #[error("Process #{0} is still running")]
    StillRunning(ProcessId),

    #[error("Failed to kill process #{id}: {source}")]
    Kill {
        id: ProcessId,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level errors surfaced to the binary
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Incomplete environment, missing variables:\n{}", format_missing(.0))]
    MissingEnvironment(Vec<String>),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    Launch(#[from] LaunchError),
}

fn format_missing(vars: &[String]) -> String {
    vars.iter()
        .map(|var| format!("- {}", var))
        .collect::<Vec<_>>()
        .join("\n")
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
