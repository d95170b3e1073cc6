//! Presentation pages
//!
//! List models handed to the frontend. The navigator keeps one page of hierarchy
//! items and one page of actions per level, in step with the frame stack.

use crate::frame::FrameKind;
use crate::types::EntityId;
use serde::Serialize;
use serde_json::{Map, Value};

/// Hierarchy item (roles: id, name, type, label, icon, group)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FrameKind,
    pub label: String,
    pub icon: String,
    pub group: Option<String>,
    /// Document data shown alongside the item
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
}

impl ListItem {
    pub fn new(id: EntityId, name: impl Into<String>, kind: FrameKind) -> Self {
        let name = name.into();
        Self {
            id,
            label: name.clone(),
            name,
            kind,
            icon: kind.icon().to_string(),
            group: None,
            data: Map::new(),
        }
    }

    /// An item is selected by id or by name.
    pub fn is_selected_by(&self, selection: &str) -> bool {
        self.id.as_str() == selection || self.name == selection
    }
}

/// Action item (roles: id, name, label, icon, color)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRecord {
    pub name: String,
    pub label: String,
    pub icon: String,
    pub color: Option<String>,
    pub order: i32,
}

/// Stack of pages, one per navigation level.
#[derive(Debug, Clone)]
pub struct PageStack<T> {
    pages: Vec<Vec<T>>,
}

impl<T> Default for PageStack<T> {
    fn default() -> Self {
        Self { pages: Vec::new() }
    }
}

impl<T> PageStack<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, items: Vec<T>) {
        self.pages.push(items);
    }

    pub fn pop(&mut self) -> Option<Vec<T>> {
        self.pages.pop()
    }

    /// Items of the visible page; empty when no page is pushed.
    pub fn top(&self) -> &[T] {
        self.pages.last().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn depth(&self) -> usize {
        self.pages.len()
    }

    pub fn clear(&mut self) {
        self.pages.clear();
    }
}
