//! CLI route: builds the run context and dispatches commands.

use crate::action::{PluginRegistry, StaticRegistry};
use crate::cli::parse::{Cli, Commands};
use crate::cli::presentation::format_event;
use crate::cli::shell;
use crate::config::{validation_failure, ConfigLoader, LauncherConfig};
use crate::demo::{demo_registry, demo_store, DEMO_ROOT};
use crate::error::{ApiError, StoreError};
use crate::navigation::Navigator;
use crate::process::{ProcessEvent, Supervisor};
use crate::session::Session;
use crate::store::{DocumentStore, FilesystemStore, MemoryStore};
use crate::types::ProcessId;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable naming the registered projects root.
pub const PROJECTS_ENV: &str = "LAUNCHPAD_PROJECTS";

/// Everything a command needs: configuration, session, engine and supervisor.
pub struct RunContext {
    pub(crate) config: LauncherConfig,
    pub(crate) session: Session,
    pub(crate) navigator: Navigator,
    pub(crate) supervisor: Supervisor,
}

impl RunContext {
    pub fn new(cli: &Cli) -> Result<Self, ApiError> {
        let workspace = workspace_root(cli);
        let config = load_config(cli, &workspace)?;
        config
            .validate()
            .map_err(|errors| validation_failure(&errors))?;
        check_environment(&required_variables(&config, cli.demo), |name| {
            std::env::var(name).ok()
        })?;

        let projects_root = resolve_projects_root(cli, &config, std::env::var(PROJECTS_ENV).ok());
        let (store, registry): (Arc<dyn DocumentStore>, Arc<dyn PluginRegistry>) = if cli.demo {
            info!("Running in demo mode");
            (Arc::new(demo_store()), Arc::new(demo_registry()))
        } else if let Some(database) = &cli.database {
            (
                Arc::new(MemoryStore::load(database)?),
                Arc::new(StaticRegistry::new()),
            )
        } else {
            (
                Arc::new(FilesystemStore::scan(&projects_root, &config.silos)?),
                Arc::new(StaticRegistry::new()),
            )
        };

        let session = Session::new(
            projects_root.to_string_lossy().into_owned(),
            config.label.clone(),
        );
        Self::from_parts(config, store, registry, session, Supervisor::new())
    }

    /// Assemble a context from ready-made parts and initialise the navigator.
    pub fn from_parts(
        config: LauncherConfig,
        store: Arc<dyn DocumentStore>,
        registry: Arc<dyn PluginRegistry>,
        mut session: Session,
        supervisor: Supervisor,
    ) -> Result<Self, ApiError> {
        let mut navigator = Navigator::new(store, registry, config.clone());
        navigator.init(&mut session)?;
        Ok(Self {
            config,
            session,
            navigator,
            supervisor,
        })
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }

    pub fn execute(&mut self, command: &Commands) -> Result<String, ApiError> {
        debug!(?command, "Executing command");
        match command {
            Commands::Shell => shell::run(self).map(|()| String::new()),
            Commands::Browse { path, format } => self.handle_browse(path, format),
            Commands::Run { action, path } => self.handle_run(action, path),
            Commands::Validate => Ok(format!(
                "Configuration is valid: {} tasks, {} apps, silos [{}]",
                self.config.tasks.len(),
                self.config.apps.len(),
                self.config.silos.join(", ")
            )),
        }
    }

    /// Push every selection of `path` in turn.
    pub fn navigate(&mut self, path: &[String]) -> Result<(), ApiError> {
        for selection in path {
            self.navigator.push(&mut self.session, selection)?;
        }
        Ok(())
    }

    fn handle_browse(&mut self, path: &[String], format: &str) -> Result<String, ApiError> {
        self.navigate(path)?;
        if format == "json" {
            let out = serde_json::json!({
                "breadcrumbs": self.navigator.breadcrumbs(),
                "items": self.navigator.items(),
                "actions": self.navigator.actions(),
                "environment": self.navigator.environment(),
            });
            return serde_json::to_string_pretty(&out)
                .map_err(|e| ApiError::Store(StoreError::Json(e)));
        }
        Ok(shell::listing(self))
    }

    fn handle_run(&mut self, action: &str, path: &[String]) -> Result<String, ApiError> {
        self.navigate(path)?;
        let Some(id) = self
            .navigator
            .trigger(&self.session, &self.supervisor, action)?
        else {
            return Ok(format!("{} completed", action));
        };
        let ended = self.follow(id, |line| println!("{}", line));
        Ok(match ended {
            Some(ProcessEvent::Ended { exit_code, .. }) => match exit_code {
                Some(code) => format!("{} exited with code {}", action, code),
                None => format!("{} ended", action),
            },
            _ => format!("{} is still running as #{}", action, id),
        })
    }

    /// Print events through `emit` until process `id` ends; returns its end event.
    pub(crate) fn follow<F>(&self, id: ProcessId, mut emit: F) -> Option<ProcessEvent>
    where
        F: FnMut(String),
    {
        loop {
            let event = self.supervisor.next_event(Duration::from_millis(250));
            let Some(event) = event else {
                match self.supervisor.record(id) {
                    Some(record) if !record.terminated => continue,
                    _ => return None,
                }
            };
            let label = self.supervisor.record(event.id()).map(|record| record.label);
            emit(format_event(&event, label.as_deref()));
            if event.id() == id && event.is_terminal() {
                return Some(event);
            }
        }
    }
}

fn workspace_root(cli: &Cli) -> PathBuf {
    cli.root
        .clone()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Configuration for this invocation: an explicit file or the layered sources.
pub fn load_config(cli: &Cli, workspace: &Path) -> Result<LauncherConfig, ApiError> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load(workspace)?,
    };
    Ok(config)
}

/// Variables that must be set before startup.
///
/// Demo mode brings its own projects root.
pub fn required_variables(config: &LauncherConfig, demo: bool) -> Vec<String> {
    let mut required = Vec::new();
    if !demo {
        required.push(PROJECTS_ENV.to_string());
    }
    for name in &config.required_environment {
        if !required.contains(name) {
            required.push(name.clone());
        }
    }
    required
}

/// Fail with every missing variable listed.
pub fn check_environment<F>(required: &[String], lookup: F) -> Result<(), ApiError>
where
    F: Fn(&str) -> Option<String>,
{
    let missing: Vec<String> = required
        .iter()
        .filter(|name| lookup(name).is_none())
        .cloned()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::MissingEnvironment(missing))
    }
}

/// Projects root: `--root`, then the config, then the environment.
pub fn resolve_projects_root(
    cli: &Cli,
    config: &LauncherConfig,
    from_env: Option<String>,
) -> PathBuf {
    if cli.demo && cli.root.is_none() {
        return PathBuf::from(DEMO_ROOT);
    }
    cli.root
        .clone()
        .or_else(|| config.projects_root.clone())
        .or_else(|| from_env.map(PathBuf::from))
        .unwrap_or_else(|| workspace_root(cli))
}
