//! Listing queries
//!
//! Builds the item pages shown at each level from store documents.

use crate::config::TaskDefinition;
use crate::error::StoreError;
use crate::frame::FrameKind;
use crate::model::ListItem;
use crate::store::{DocumentStore, Entity, Query};
use crate::types::EntityId;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Synthetic group shown for task items.
pub const TASK_GROUP: &str = "Tasks";

/// Visible projects sorted by name.
pub fn project_items(store: &dyn DocumentStore) -> Result<Vec<ListItem>, StoreError> {
    let mut projects: Vec<Entity> = store
        .projects()?
        .into_iter()
        .filter(Entity::is_visible)
        .collect();
    projects.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(projects
        .iter()
        .map(|project| entity_item(project, FrameKind::Project))
        .collect())
}

/// Silo names below a project, or `None` when the store has no silo partitioning.
///
/// Assets without a silo show up as a `null` value; their presence also means the
/// store predates silos.
pub fn silo_names(
    store: &dyn DocumentStore,
    project: &EntityId,
) -> Result<Option<Vec<String>>, StoreError> {
    let values = store.distinct(&Query::assets().parent(project.clone()), "silo")?;
    if values.is_empty() || values.iter().any(Value::is_null) {
        return Ok(None);
    }
    let mut names: Vec<String> = values
        .iter()
        .filter_map(|value| value.as_str().map(str::to_string))
        .collect();
    names.sort();
    Ok(Some(names))
}

pub fn silo_items(names: &[String]) -> Vec<ListItem> {
    names
        .iter()
        .map(|name| ListItem::new(EntityId::new(name.clone()), name.clone(), FrameKind::Silo))
        .collect()
}

/// Top-level assets matching `query`: visible and without a visual parent.
pub fn top_level_asset_items(
    store: &dyn DocumentStore,
    query: &Query,
) -> Result<Vec<ListItem>, StoreError> {
    let assets = store
        .find(query)?
        .into_iter()
        .filter(|asset| asset.is_visible() && asset.visual_parent().is_none())
        .collect();
    Ok(asset_items(assets))
}

/// Visible assets whose visual parent is `parent`.
pub fn child_asset_items(
    store: &dyn DocumentStore,
    project: &EntityId,
    parent: &EntityId,
) -> Result<Vec<ListItem>, StoreError> {
    let query = Query::assets()
        .parent(project.clone())
        .data_eq("visualParent", Value::String(parent.0.clone()));
    let assets = store
        .find(&query)?
        .into_iter()
        .filter(Entity::is_visible)
        .collect();
    Ok(asset_items(assets))
}

/// Assets sorted by group, ungrouped first, then by name.
fn asset_items(mut assets: Vec<Entity>) -> Vec<ListItem> {
    assets.sort_by(compare_grouped);
    assets
        .iter()
        .map(|asset| entity_item(asset, FrameKind::Asset))
        .collect()
}

fn compare_grouped(a: &Entity, b: &Entity) -> Ordering {
    let group = |entity: &Entity| {
        entity
            .data
            .get("group")
            .and_then(Value::as_str)
            .unwrap_or("0")
            .to_string()
    };
    group(a)
        .cmp(&group(b))
        .then_with(|| a.name.cmp(&b.name))
}

fn entity_item(entity: &Entity, kind: FrameKind) -> ListItem {
    let mut item = ListItem::new(entity.id.clone(), entity.name.clone(), kind);
    if let Some(label) = entity.data.get("label").and_then(Value::as_str) {
        item.label = label.to_string();
    }
    if let Some(icon) = entity.data.get("icon").and_then(Value::as_str) {
        item.icon = icon.to_string();
    }
    item.group = entity
        .data
        .get("group")
        .and_then(Value::as_str)
        .map(str::to_string);
    item.data = entity.data.clone();
    item
}

/// Tasks offered below `asset`.
///
/// An asset's `data.tasks` list overrides the project tasks; entries the project
/// defines keep the project's label and icon.
pub fn task_definitions(project_tasks: &[TaskDefinition], asset: &Entity) -> Vec<TaskDefinition> {
    let mut tasks: Vec<TaskDefinition> = match asset.data.get("tasks").and_then(Value::as_array) {
        Some(overrides) => {
            let configured: BTreeMap<&str, &TaskDefinition> = project_tasks
                .iter()
                .map(|task| (task.name.as_str(), task))
                .collect();
            overrides
                .iter()
                .filter_map(|entry| match entry {
                    Value::String(name) => Some(
                        configured
                            .get(name.as_str())
                            .map(|task| (*task).clone())
                            .unwrap_or_else(|| TaskDefinition::named(name.clone())),
                    ),
                    other => serde_json::from_value::<TaskDefinition>(other.clone()).ok(),
                })
                .collect()
        }
        None => project_tasks.to_vec(),
    };
    tasks.sort_by(|a, b| a.name.cmp(&b.name));
    tasks
}

pub fn task_items(tasks: &[TaskDefinition]) -> Vec<ListItem> {
    tasks
        .iter()
        .map(|task| {
            let mut item = ListItem::new(
                EntityId::new(task.name.clone()),
                task.name.clone(),
                FrameKind::Task,
            );
            if let Some(label) = &task.label {
                item.label = label.clone();
            }
            if let Some(icon) = &task.icon {
                item.icon = icon.clone();
            }
            item.group = Some(TASK_GROUP.to_string());
            item
        })
        .collect()
}
