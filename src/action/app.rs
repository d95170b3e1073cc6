//! Application actions built from app definitions.

use crate::action::{Action, ActionContext, ActionOutcome};
use crate::config::AppDefinition;
use crate::error::LaunchError;
use crate::process::{spawn, LaunchRequest};
use crate::session::SessionKey;
use crate::types::SessionMap;
use tracing::info;

/// Launches an application once a task is selected.
#[derive(Debug, Clone)]
pub struct AppAction {
    name: String,
    definition: AppDefinition,
}

impl AppAction {
    pub fn new(definition: AppDefinition) -> Self {
        Self {
            name: definition.action_name(),
            definition,
        }
    }

    pub fn definition(&self) -> &AppDefinition {
        &self.definition
    }

    /// Launch request for `session`: session keys, then the app's own variables.
    pub fn request(&self, session: &SessionMap) -> LaunchRequest {
        let mut environment = session.clone();
        environment.extend(
            self.definition
                .environment
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        LaunchRequest::new(self.definition.executable.clone())
            .with_args(self.definition.args.iter().cloned())
            .with_environment(environment)
            .with_label(self.name.clone())
    }
}

impl Action for AppAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> Option<&str> {
        self.definition.label.as_deref()
    }

    fn icon(&self) -> Option<&str> {
        self.definition.icon.as_deref()
    }

    fn color(&self) -> Option<&str> {
        self.definition.color.as_deref()
    }

    fn order(&self) -> i32 {
        self.definition.order
    }

    fn is_compatible(&self, session: &SessionMap) -> bool {
        [SessionKey::Project, SessionKey::Asset, SessionKey::Task]
            .iter()
            .all(|key| session.contains_key(key.env_name()))
    }

    fn process(&self, context: &ActionContext<'_>) -> Result<ActionOutcome, LaunchError> {
        let request = self.request(context.session);
        info!(app = %self.name, executable = %request.executable, "Launching application");
        spawn(&request, context.os_environment).map(ActionOutcome::Spawned)
    }
}
