//! Navigation Frames
//!
//! A frame is a snapshot of the navigation state at one level of the hierarchy:
//! which entity was selected, the environment visible there and the entity's data.
//! Frames are pushed and popped on a [`FrameStack`] owned by the navigator.

pub mod stack;

pub use stack::FrameStack;

use crate::types::{EntityId, Environment};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Hierarchy level of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    Project,
    Silo,
    Asset,
    Task,
}

impl FrameKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FrameKind::Project => "project",
            FrameKind::Silo => "silo",
            FrameKind::Asset => "asset",
            FrameKind::Task => "task",
        }
    }

    /// Default icon for items of this kind.
    pub fn icon(self) -> &'static str {
        match self {
            FrameKind::Project => "map",
            FrameKind::Silo => "database",
            FrameKind::Asset => "plus-square",
            FrameKind::Task => "male",
        }
    }

    /// Rank from most general (project) to most specific (task).
    pub fn depth_rank(self) -> u8 {
        match self {
            FrameKind::Project => 0,
            FrameKind::Silo => 1,
            FrameKind::Asset => 2,
            FrameKind::Task => 3,
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub kind: FrameKind,
    pub name: String,
    /// Entity id of the selection; silo frames use the silo name
    pub id: EntityId,
    pub environment: Environment,
    pub data: Map<String, Value>,
    /// Task names offered below an asset frame
    pub tasks: Option<Vec<String>>,
}

impl Frame {
    /// Whether `name` is one of the tasks listed below this frame.
    pub fn offers_task(&self, name: &str) -> bool {
        self.tasks
            .as_ref()
            .is_some_and(|tasks| tasks.iter().any(|task| task == name))
    }
}
