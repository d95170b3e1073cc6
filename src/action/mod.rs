//! Actions
//!
//! Environment-aware operations offered to the operator. Actions come from a
//! [`PluginRegistry`] and from the application definitions of the current project;
//! only those compatible with the current session are listed.

pub mod app;
pub mod registry;

pub use app::AppAction;
pub use registry::{collect_compatible, ActionSet, PluginRegistry, StaticRegistry};

use crate::error::LaunchError;
use crate::process::SpawnedProcess;
use crate::types::{Environment, SessionMap};

/// Default icon for actions that do not name one.
pub const DEFAULT_ACTION_ICON: &str = "cube";

/// What an action is given when triggered.
pub struct ActionContext<'a> {
    /// Session mapping for the current frame
    pub session: &'a SessionMap,
    /// Environment `{VAR}` placeholders are expanded against
    pub os_environment: &'a Environment,
}

/// Result of processing an action
#[derive(Debug)]
pub enum ActionOutcome {
    /// A process was started; it is monitored when it exposes an output stream
    Spawned(SpawnedProcess),
    /// The action ran to completion synchronously
    Completed,
}

/// Pluggable action
///
/// `name` and `process` and the compatibility check are required; the display
/// fields are optional and defaulted when listed.
pub trait Action: Send + Sync {
    fn name(&self) -> &str;

    fn label(&self) -> Option<&str> {
        None
    }

    fn icon(&self) -> Option<&str> {
        None
    }

    fn color(&self) -> Option<&str> {
        None
    }

    /// Sort key among listed actions; ties are broken by name
    fn order(&self) -> i32 {
        0
    }

    fn is_compatible(&self, session: &SessionMap) -> bool;

    fn process(&self, context: &ActionContext<'_>) -> Result<ActionOutcome, LaunchError>;
}
