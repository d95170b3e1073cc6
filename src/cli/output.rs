//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, LaunchError, NavigationError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Navigation(NavigationError::Launch(LaunchError::ExecutableNotFound(exe)))
        | ApiError::Launch(LaunchError::ExecutableNotFound(exe)) => {
            format!("'{}' was not found on PATH or on disk", exe)
        }
        other => other.to_string(),
    }
}
