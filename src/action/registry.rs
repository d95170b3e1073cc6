//! Action registry and compatibility filter.

use crate::action::{Action, DEFAULT_ACTION_ICON};
use crate::model::ActionRecord;
use crate::types::SessionMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

/// Source of pluggable actions
pub trait PluginRegistry: Send + Sync {
    /// Actions available to the launcher, in discovery order.
    fn discover(&self) -> Vec<Arc<dyn Action>>;
}

/// Registry over a fixed list of actions
#[derive(Default, Clone)]
pub struct StaticRegistry {
    actions: Vec<Arc<dyn Action>>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, action: Arc<dyn Action>) {
        self.actions.push(action);
    }

    pub fn with(mut self, action: impl Action + 'static) -> Self {
        self.register(Arc::new(action));
        self
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl PluginRegistry for StaticRegistry {
    fn discover(&self) -> Vec<Arc<dyn Action>> {
        self.actions.clone()
    }
}

/// Actions registered for the current project context
#[derive(Default, Clone)]
pub struct ActionSet {
    actions: Vec<Arc<dyn Action>>,
}

impl ActionSet {
    pub fn new(actions: Vec<Arc<dyn Action>>) -> Self {
        Self { actions }
    }

    /// Exact-name lookup; the first registered match wins.
    pub fn find(&self, name: &str) -> Option<Arc<dyn Action>> {
        self.actions
            .iter()
            .find(|action| action.name() == name)
            .cloned()
    }

    pub fn compatible(&self, session: &SessionMap) -> Vec<ActionRecord> {
        collect_compatible(&self.actions, session)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Display records of the actions compatible with `session`, sorted by `(order, name)`.
///
/// A compatibility check that panics excludes its action.
pub fn collect_compatible(actions: &[Arc<dyn Action>], session: &SessionMap) -> Vec<ActionRecord> {
    let mut records: Vec<ActionRecord> = actions
        .iter()
        .filter(|action| check(action.as_ref(), session))
        .map(|action| ActionRecord {
            name: action.name().to_string(),
            label: action.label().unwrap_or(action.name()).to_string(),
            icon: action.icon().unwrap_or(DEFAULT_ACTION_ICON).to_string(),
            color: action.color().map(str::to_string),
            order: action.order(),
        })
        .collect();
    // Stable, so equal (order, name) keep discovery order.
    records.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
    debug!(
        discovered = actions.len(),
        compatible = records.len(),
        "Collected compatible actions"
    );
    records
}

fn check(action: &dyn Action, session: &SessionMap) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(|| action.is_compatible(session))) {
        Ok(compatible) => compatible,
        Err(_) => {
            warn!(action = %action.name(), "Compatibility check panicked, excluding action");
            false
        }
    }
}
