//! In-memory document store, optionally loaded from a JSON document file.

use crate::error::StoreError;
use crate::store::{DocumentStore, Entity, Query};
use std::path::Path;
use tracing::debug;

/// Vector-backed store; `find` returns documents in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entities: Vec<Entity>,
}

impl MemoryStore {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    /// Load a JSON array of entity documents.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)?;
        let store = Self::from_json_str(&content)?;
        debug!(
            path = %path.display(),
            documents = store.len(),
            "Loaded document store"
        );
        Ok(store)
    }

    pub fn from_json_str(content: &str) -> Result<Self, StoreError> {
        let entities: Vec<Entity> = serde_json::from_str(content)?;
        Ok(Self::new(entities))
    }

    pub fn insert(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn find(&self, query: &Query) -> Result<Vec<Entity>, StoreError> {
        Ok(self
            .entities
            .iter()
            .filter(|entity| query.matches(entity))
            .cloned()
            .collect())
    }
}
