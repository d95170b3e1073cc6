//! Document Store
//!
//! Read-only access to project and asset documents. The navigator only ever talks to
//! the [`DocumentStore`] trait; concrete stores are an in-memory/JSON store and a store
//! derived from a directory tree.

pub mod filesystem;
pub mod memory;

pub use filesystem::FilesystemStore;
pub use memory::MemoryStore;

use crate::config::ProjectConfig;
use crate::error::StoreError;
use crate::types::{EntityId, EntityKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Entity document as held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "_id", alias = "id")]
    pub id: EntityId,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub silo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<EntityId>,
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Project configuration (tasks, apps, templates); only meaningful on project documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ProjectConfig>,
}

impl Entity {
    pub fn project(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: EntityKind::Project,
            name: name.into(),
            silo: None,
            parent: None,
            data: Map::new(),
            config: None,
        }
    }

    pub fn asset(
        id: impl Into<EntityId>,
        name: impl Into<String>,
        parent: impl Into<EntityId>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: EntityKind::Asset,
            name: name.into(),
            silo: None,
            parent: Some(parent.into()),
            data: Map::new(),
            config: None,
        }
    }

    pub fn with_silo(mut self, silo: impl Into<String>) -> Self {
        self.silo = Some(silo.into());
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    pub fn with_config(mut self, config: ProjectConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Hidden documents carry `data.visible == false`; anything else is visible.
    pub fn is_visible(&self) -> bool {
        self.data
            .get("visible")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    /// `visualParent` when set to a non-null value.
    pub fn visual_parent(&self) -> Option<&Value> {
        self.data.get("visualParent").filter(|value| !value.is_null())
    }

    /// Resolve a queryable field: `_id`, `type`, `name`, `silo`, `parent` or `data.<key>`.
    ///
    /// Missing fields resolve to `null`.
    pub fn field(&self, field: &str) -> Value {
        match field {
            "_id" | "id" => Value::String(self.id.0.clone()),
            "type" => Value::String(self.kind.as_str().to_string()),
            "name" => Value::String(self.name.clone()),
            "silo" => self.silo.clone().map(Value::String).unwrap_or(Value::Null),
            "parent" => self
                .parent
                .as_ref()
                .map(|p| Value::String(p.0.clone()))
                .unwrap_or(Value::Null),
            other => match other.strip_prefix("data.") {
                Some(key) => self.data.get(key).cloned().unwrap_or(Value::Null),
                None => Value::Null,
            },
        }
    }
}

/// Structural filter over entity documents
///
/// Every set constraint must hold. Data constraints compare with JSON equality, and a
/// `null` constraint also matches documents where the field is missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub kind: Option<EntityKind>,
    pub id: Option<EntityId>,
    pub name: Option<String>,
    pub parent: Option<EntityId>,
    pub silo: Option<String>,
    pub data: Vec<(String, Value)>,
}

impl Query {
    pub fn projects() -> Self {
        Self {
            kind: Some(EntityKind::Project),
            ..Self::default()
        }
    }

    pub fn assets() -> Self {
        Self {
            kind: Some(EntityKind::Asset),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<EntityId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn parent(mut self, parent: impl Into<EntityId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn silo(mut self, silo: impl Into<String>) -> Self {
        self.silo = Some(silo.into());
        self
    }

    pub fn data_eq(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.push((key.into(), value));
        self
    }

    pub fn matches(&self, entity: &Entity) -> bool {
        if self.kind.is_some_and(|kind| kind != entity.kind) {
            return false;
        }
        if self.id.as_ref().is_some_and(|id| *id != entity.id) {
            return false;
        }
        if self.name.as_ref().is_some_and(|name| *name != entity.name) {
            return false;
        }
        if self.parent.is_some() && self.parent != entity.parent {
            return false;
        }
        if self.silo.is_some() && self.silo != entity.silo {
            return false;
        }
        self.data.iter().all(|(key, expected)| {
            match entity.data.get(key) {
                Some(actual) => actual == expected,
                None => expected.is_null(),
            }
        })
    }
}

/// Document store interface
///
/// Calls are synchronous and expected to be fast local lookups.
pub trait DocumentStore: Send + Sync {
    /// All documents matching `query`, in store order.
    fn find(&self, query: &Query) -> Result<Vec<Entity>, StoreError>;

    fn find_one(&self, query: &Query) -> Result<Option<Entity>, StoreError> {
        Ok(self.find(query)?.into_iter().next())
    }

    fn projects(&self) -> Result<Vec<Entity>, StoreError> {
        self.find(&Query::projects())
    }

    /// Distinct values of `field` across documents matching `query`, in first-seen order.
    ///
    /// Documents lacking the field contribute `null`.
    fn distinct(&self, query: &Query, field: &str) -> Result<Vec<Value>, StoreError> {
        let mut values: Vec<Value> = Vec::new();
        for entity in self.find(query)? {
            let value = entity.field(field);
            if !values.contains(&value) {
                values.push(value);
            }
        }
        Ok(values)
    }
}
