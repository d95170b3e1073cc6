//! Navigation Engine
//!
//! Drives the frame stack through `project -> silo? -> asset -> task`. Each level
//! pushes one frame, one page of items and one page of compatible actions; popping
//! discards all three together. The root page (projects) sits below the first frame,
//! so the item and action pages always number one more than the frames.

pub mod listing;

use crate::action::{Action, ActionContext, ActionOutcome, ActionSet, AppAction, PluginRegistry};
use crate::config::{LauncherConfig, ProjectConfig};
use crate::environment::{materialize_session, partial_format, resolve};
use crate::error::NavigationError;
use crate::frame::{Frame, FrameKind, FrameStack};
use crate::model::{ActionRecord, ListItem, PageStack};
use crate::process::Supervisor;
use crate::session::Session;
use crate::store::{DocumentStore, Query};
use crate::types::{EntityId, Environment, ProcessId, SessionMap};
use serde_json::Map;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Header pushed when the project listing is shown.
pub const ROOT_HEADER: &str = "Root";

/// Title used when no studio label is configured.
pub const DEFAULT_TITLE: &str = "Launchpad";

/// Notifications for the frontend, drained after each call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    Pushed(String),
    Popped,
    ReturnedToRoot,
}

/// How far to pop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopTarget {
    /// One level
    Back,
    /// `n` levels
    Steps(usize),
    /// Past the root, re-initialising the engine
    Refresh,
    /// Down to the breadcrumb at this index
    Breadcrumb(usize),
}

impl PopTarget {
    fn steps(self, depth: usize) -> usize {
        match self {
            PopTarget::Back => 1,
            PopTarget::Steps(steps) => steps,
            PopTarget::Refresh => depth + 1,
            PopTarget::Breadcrumb(index) => depth.saturating_sub(index + 1),
        }
    }
}

/// Result of a pop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PopOutcome {
    pub popped: usize,
    pub returned_to_root: bool,
}

/// Project the navigator has entered
#[derive(Debug, Clone)]
struct ProjectContext {
    id: EntityId,
    config: ProjectConfig,
}

pub struct Navigator {
    store: Arc<dyn DocumentStore>,
    registry: Arc<dyn PluginRegistry>,
    config: LauncherConfig,
    stack: FrameStack,
    items: PageStack<ListItem>,
    actions: PageStack<ActionRecord>,
    registered: ActionSet,
    project: Option<ProjectContext>,
    events: Vec<NavigationEvent>,
}

impl Navigator {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        registry: Arc<dyn PluginRegistry>,
        config: LauncherConfig,
    ) -> Self {
        Self {
            store,
            registry,
            config,
            stack: FrameStack::new(),
            items: PageStack::new(),
            actions: PageStack::new(),
            registered: ActionSet::default(),
            project: None,
            events: Vec::new(),
        }
    }

    /// Reset to the project listing and rediscover actions.
    pub fn init(&mut self, session: &mut Session) -> Result<(), NavigationError> {
        info!("Initialising navigator");
        let projects = listing::project_items(self.store.as_ref())?;
        self.reset_to_root(session, projects);
        Ok(())
    }

    /// Show `projects` as the only page with the root action set. Cannot fail.
    fn reset_to_root(&mut self, session: &mut Session, projects: Vec<ListItem>) {
        self.stack.clear();
        self.items.clear();
        self.actions.clear();
        self.project = None;
        session.sync_from_stack(&self.stack);

        self.items.push(projects);
        self.registered = ActionSet::new(self.registry.discover());
        let compatible = self.registered.compatible(&self.frame_session(session));
        self.actions.push(compatible);

        self.events.push(NavigationEvent::Pushed(ROOT_HEADER.to_string()));
        debug!(
            projects = self.items.top().len(),
            actions = self.registered.len(),
            "Navigator ready"
        );
    }

    /// Descend into the item named or identified by `selection` on the visible page.
    ///
    /// Nothing changes when the selection fails.
    pub fn push(&mut self, session: &mut Session, selection: &str) -> Result<Frame, NavigationError> {
        if let Some(top) = self.stack.top() {
            if top.kind == FrameKind::Task {
                return Err(NavigationError::AtLeaf(top.name.clone()));
            }
        }
        let item = self
            .items
            .top()
            .iter()
            .find(|item| item.is_selected_by(selection))
            .cloned()
            .ok_or_else(|| self.invalid_selection(selection))?;

        let parent_environment = self
            .stack
            .top()
            .map(|frame| frame.environment.clone())
            .unwrap_or_default();

        let (frame, page) = match item.kind {
            FrameKind::Project => self.enter_project(&item, &parent_environment)?,
            FrameKind::Silo => self.enter_silo(&item, &parent_environment)?,
            FrameKind::Asset => self.enter_asset(&item, &parent_environment)?,
            FrameKind::Task => self.enter_task(&item, &parent_environment),
        };

        let name = frame.name.clone();
        self.stack.push(frame.clone());
        self.items.push(page);
        session.sync_from_stack(&self.stack);
        let compatible = self.registered.compatible(&self.frame_session(session));
        self.actions.push(compatible);
        self.events.push(NavigationEvent::Pushed(name.clone()));

        info!(kind = %frame.kind, name = %name, depth = self.stack.depth(), "Pushed frame");
        Ok(frame)
    }

    fn enter_project(
        &mut self,
        item: &ListItem,
        parent: &Environment,
    ) -> Result<(Frame, Vec<ListItem>), NavigationError> {
        let project = self
            .store
            .find_one(&Query::projects().id(item.id.clone()))?
            .ok_or_else(|| self.invalid_selection(item.id.as_str()))?;
        info!(project = %project.name, "Entering project");

        let config = project
            .config
            .clone()
            .unwrap_or_else(|| self.config.project_defaults());

        let page = match listing::silo_names(self.store.as_ref(), &project.id)? {
            Some(silos) => listing::silo_items(&silos),
            None => listing::top_level_asset_items(
                self.store.as_ref(),
                &Query::assets().parent(project.id.clone()),
            )?,
        };

        let mut discovered = self.registry.discover();
        discovered.extend(
            config
                .apps
                .iter()
                .cloned()
                .map(|app| Arc::new(AppAction::new(app)) as Arc<dyn Action>),
        );
        self.registered = ActionSet::new(discovered);
        self.project = Some(ProjectContext {
            id: project.id.clone(),
            config,
        });

        let frame = Frame {
            kind: FrameKind::Project,
            name: project.name.clone(),
            id: project.id.clone(),
            environment: resolve(parent, FrameKind::Project, &project.name, &project.data),
            data: project.data,
            tasks: None,
        };
        Ok((frame, page))
    }

    fn enter_silo(
        &self,
        item: &ListItem,
        parent: &Environment,
    ) -> Result<(Frame, Vec<ListItem>), NavigationError> {
        let project = self.project_context(item)?;
        let query = Query::assets()
            .parent(project.id.clone())
            .silo(item.name.clone());
        let page = listing::top_level_asset_items(self.store.as_ref(), &query)?;

        let frame = Frame {
            kind: FrameKind::Silo,
            name: item.name.clone(),
            id: item.id.clone(),
            environment: resolve(parent, FrameKind::Silo, &item.name, &Map::new()),
            data: Map::new(),
            tasks: None,
        };
        Ok((frame, page))
    }

    fn enter_asset(
        &self,
        item: &ListItem,
        parent: &Environment,
    ) -> Result<(Frame, Vec<ListItem>), NavigationError> {
        let project = self.project_context(item)?;
        let asset = self
            .store
            .find_one(&Query::assets().id(item.id.clone()))?
            .ok_or_else(|| self.invalid_selection(item.id.as_str()))?;

        let tasks = listing::task_definitions(&project.config.tasks, &asset);
        let mut page = listing::child_asset_items(self.store.as_ref(), &project.id, &asset.id)?;
        page.extend(listing::task_items(&tasks));

        let frame = Frame {
            kind: FrameKind::Asset,
            name: asset.name.clone(),
            id: asset.id.clone(),
            environment: resolve(parent, FrameKind::Asset, &asset.name, &asset.data),
            data: asset.data,
            tasks: Some(tasks.into_iter().map(|task| task.name).collect()),
        };
        Ok((frame, page))
    }

    fn enter_task(&self, item: &ListItem, parent: &Environment) -> (Frame, Vec<ListItem>) {
        let frame = Frame {
            kind: FrameKind::Task,
            name: item.name.clone(),
            id: item.id.clone(),
            environment: resolve(parent, FrameKind::Task, &item.name, &Map::new()),
            data: Map::new(),
            tasks: None,
        };
        (frame, Vec::new())
    }

    fn project_context(&self, item: &ListItem) -> Result<&ProjectContext, NavigationError> {
        self.project
            .as_ref()
            .ok_or_else(|| self.invalid_selection(item.id.as_str()))
    }

    fn invalid_selection(&self, selection: &str) -> NavigationError {
        let scope = self
            .stack
            .top()
            .map(|frame| format!("{} '{}'", frame.kind, frame.name))
            .unwrap_or_else(|| ROOT_HEADER.to_string());
        NavigationError::InvalidSelection {
            selection: selection.to_string(),
            scope,
        }
    }

    /// Pop frames with their pages.
    ///
    /// Popping past the root re-runs [`Navigator::init`] and reports it once. The
    /// project listing is fetched before anything is popped, so a failing store
    /// leaves the navigator untouched.
    pub fn pop(&mut self, session: &mut Session, target: PopTarget) -> Result<PopOutcome, NavigationError> {
        let depth = self.stack.depth();
        let steps = target.steps(depth);
        let root_listing = if steps > depth {
            Some(listing::project_items(self.store.as_ref())?)
        } else {
            None
        };
        let mut outcome = PopOutcome::default();

        for _ in 0..steps.min(depth) {
            self.stack.pop();
            self.items.pop();
            self.actions.pop();
            outcome.popped += 1;
            self.events.push(NavigationEvent::Popped);
        }

        if let Some(projects) = root_listing {
            info!("Returned to root");
            self.reset_to_root(session, projects);
            self.events.push(NavigationEvent::ReturnedToRoot);
            outcome.returned_to_root = true;
            return Ok(outcome);
        }

        if self.stack.is_empty() && self.project.take().is_some() {
            // Leaving the project drops its app actions.
            self.registered = ActionSet::new(self.registry.discover());
        }
        session.sync_from_stack(&self.stack);
        debug!(popped = outcome.popped, depth = self.stack.depth(), "Popped frames");
        Ok(outcome)
    }

    /// Independent copy of the top frame; `None` at root.
    pub fn current_frame(&self) -> Option<Frame> {
        self.stack.current()
    }

    pub fn breadcrumbs(&self) -> &[String] {
        self.stack.breadcrumbs()
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Items of the visible page.
    pub fn items(&self) -> &[ListItem] {
        self.items.top()
    }

    /// Compatible actions of the visible page.
    pub fn actions(&self) -> &[ActionRecord] {
        self.actions.top()
    }

    /// Number of item pages; always one more than the frames once initialised.
    pub fn page_depth(&self) -> usize {
        self.items.depth()
    }

    /// Key/value listing of the current frame's environment.
    pub fn environment(&self) -> Vec<(String, String)> {
        self.stack
            .top()
            .map(|frame| {
                frame
                    .environment
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Session mapping built from the current frame only.
    fn frame_session(&self, session: &Session) -> SessionMap {
        let environment = self
            .stack
            .top()
            .map(|frame| frame.environment.clone())
            .unwrap_or_default();
        materialize_session(&environment, session.projects_root())
    }

    /// Session handed to triggered actions: the session context overlaid with the
    /// current frame's keys.
    pub fn session_for_actions(&self, session: &Session) -> SessionMap {
        let mut map = session.to_map();
        map.extend(self.frame_session(session));
        map
    }

    /// Work directory of the current frame from the project's `work` template.
    ///
    /// Placeholders not yet resolvable at this depth cut the path short. Outside a
    /// project, or without a template, this is the projects root.
    pub fn work_directory(&self, session: &Session) -> PathBuf {
        let root = session.projects_root();
        let Some(template) = self
            .project
            .as_ref()
            .and_then(|project| project.config.template.get("work"))
        else {
            return PathBuf::from(root);
        };
        let mut values = self
            .stack
            .top()
            .map(|frame| frame.environment.clone())
            .unwrap_or_default();
        values.insert("root".to_string(), root.to_string());
        let formatted = partial_format(template, &values);
        match formatted.find('{') {
            Some(index) => PathBuf::from(&formatted[..index]),
            None => PathBuf::from(formatted),
        }
    }

    pub fn title(&self, session: &Session) -> String {
        match session.label().or(self.config.label.as_deref()) {
            Some(label) => format!("{} Launcher", label),
            None => DEFAULT_TITLE.to_string(),
        }
    }

    /// Run the action called `name` against the current session.
    ///
    /// A spawned process with an output stream is handed to `supervisor`; the
    /// returned id is `None` for actions that complete synchronously.
    pub fn trigger(
        &self,
        session: &Session,
        supervisor: &Supervisor,
        name: &str,
    ) -> Result<Option<ProcessId>, NavigationError> {
        let action = self
            .registered
            .find(name)
            .ok_or_else(|| NavigationError::ActionNotFound(name.to_string()))?;

        info!(action = %name, "Running action");
        let session_map = self.session_for_actions(session);
        let context = ActionContext {
            session: &session_map,
            os_environment: supervisor.os_environment(),
        };
        match action.process(&context)? {
            ActionOutcome::Spawned(spawned) => Ok(supervisor.monitor(spawned)?),
            ActionOutcome::Completed => Ok(None),
        }
    }

    /// Notifications since the last drain, in order.
    pub fn drain_events(&mut self) -> Vec<NavigationEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }
}
