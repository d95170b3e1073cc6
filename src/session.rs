//! Session context
//!
//! Process-scoped key/value context describing where the operator currently is.
//! Constructed once at startup and passed by reference into the navigator.

use crate::environment::{PROJECTS_ROOT_KEY, SESSION_PREFIX};
use crate::frame::{FrameKind, FrameStack};
use crate::types::SessionMap;
use std::collections::BTreeMap;

/// Well-known session keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SessionKey {
    Project,
    Silo,
    Asset,
    Task,
    Hierarchy,
    Label,
    Projects,
}

impl SessionKey {
    /// Keys that follow the navigation position.
    pub const POSITIONAL: [SessionKey; 5] = [
        SessionKey::Project,
        SessionKey::Silo,
        SessionKey::Asset,
        SessionKey::Task,
        SessionKey::Hierarchy,
    ];

    pub fn env_name(self) -> &'static str {
        match self {
            SessionKey::Project => "SESSION_PROJECT",
            SessionKey::Silo => "SESSION_SILO",
            SessionKey::Asset => "SESSION_ASSET",
            SessionKey::Task => "SESSION_TASK",
            SessionKey::Hierarchy => "SESSION_HIERARCHY",
            SessionKey::Label => "SESSION_LABEL",
            SessionKey::Projects => PROJECTS_ROOT_KEY,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    values: BTreeMap<SessionKey, String>,
}

impl Session {
    pub fn new(projects_root: impl Into<String>, label: Option<String>) -> Self {
        let mut session = Self::default();
        session.set(SessionKey::Projects, projects_root);
        if let Some(label) = label {
            session.set(SessionKey::Label, label);
        }
        session
    }

    pub fn get(&self, key: SessionKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    pub fn set(&mut self, key: SessionKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn remove(&mut self, key: SessionKey) -> Option<String> {
        self.values.remove(&key)
    }

    pub fn projects_root(&self) -> &str {
        self.get(SessionKey::Projects).unwrap_or_default()
    }

    pub fn label(&self) -> Option<&str> {
        self.get(SessionKey::Label)
    }

    /// Re-derive the positional keys from the frames on `stack`.
    pub fn sync_from_stack(&mut self, stack: &FrameStack) {
        for key in SessionKey::POSITIONAL {
            self.values.remove(&key);
        }
        for frame in stack.frames() {
            match frame.kind {
                FrameKind::Project => self.set(SessionKey::Project, frame.name.clone()),
                FrameKind::Silo => self.set(SessionKey::Silo, frame.name.clone()),
                FrameKind::Asset => self.set(SessionKey::Asset, frame.name.clone()),
                FrameKind::Task => self.set(SessionKey::Task, frame.name.clone()),
            }
        }
        if let Some(hierarchy) = stack
            .top()
            .and_then(|frame| frame.environment.get("hierarchy"))
        {
            self.set(SessionKey::Hierarchy, hierarchy.clone());
        }
    }

    /// `SESSION_*` mapping of every key currently set.
    pub fn to_map(&self) -> SessionMap {
        self.values
            .iter()
            .map(|(key, value)| (key.env_name().to_string(), value.clone()))
            .collect()
    }
}

/// Whether `key` is a session key (carries the session prefix).
pub fn is_session_key(key: &str) -> bool {
    key.starts_with(SESSION_PREFIX)
}
