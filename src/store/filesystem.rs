//! Directory-tree document store
//!
//! Derives documents from the layout `<root>/<project>/<silo>/<asset>/work/<task>`.
//! Every directory directly under the root is a project; every directory under one of
//! the configured silo directories is an asset of that silo. Task directories under an
//! asset's `work/` folder become the asset's `tasks` override list.

use crate::error::StoreError;
use crate::store::{DocumentStore, Entity, MemoryStore, Query};
use crate::types::EntityId;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Snapshot of a directory tree; rescan to pick up changes.
#[derive(Debug, Clone)]
pub struct FilesystemStore {
    root: PathBuf,
    documents: MemoryStore,
}

impl FilesystemStore {
    pub fn scan(root: &Path, silos: &[String]) -> Result<Self, StoreError> {
        if !root.is_dir() {
            return Err(StoreError::InvalidRoot(root.to_path_buf()));
        }
        let root = dunce::canonicalize(root)?;
        let mut documents = MemoryStore::default();

        for project_dir in child_dirs(&root) {
            let project_id = path_id(&project_dir);
            let project_name = dir_name(&project_dir);
            documents.insert(
                Entity::project(project_id.clone(), project_name)
                    .with_data("path", json!(project_dir.display().to_string())),
            );

            for silo in silos {
                let silo_dir = project_dir.join(silo);
                if !silo_dir.is_dir() {
                    continue;
                }
                for asset_dir in child_dirs(&silo_dir) {
                    let mut asset = Entity::asset(
                        path_id(&asset_dir),
                        dir_name(&asset_dir),
                        project_id.clone(),
                    )
                    .with_silo(silo.clone())
                    .with_data("path", json!(asset_dir.display().to_string()));

                    let work_dir = asset_dir.join("work");
                    if work_dir.is_dir() {
                        let tasks: Vec<Value> = child_dirs(&work_dir)
                            .iter()
                            .map(|task_dir| json!(dir_name(task_dir)))
                            .collect();
                        asset = asset.with_data("tasks", Value::Array(tasks));
                    }
                    documents.insert(asset);
                }
            }
        }

        debug!(
            root = %root.display(),
            documents = documents.len(),
            "Scanned filesystem store"
        );
        Ok(Self { root, documents })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentStore for FilesystemStore {
    fn find(&self, query: &Query) -> Result<Vec<Entity>, StoreError> {
        self.documents.find(query)
    }
}

fn child_dirs(dir: &Path) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();
    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_dir() => {
                let hidden = entry.file_name().to_string_lossy().starts_with('.');
                if !hidden {
                    dirs.push(entry.into_path());
                }
            }
            Ok(_) => {}
            Err(e) => warn!(dir = %dir.display(), "Skipping unreadable entry: {}", e),
        }
    }
    dirs
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn path_id(path: &Path) -> EntityId {
    EntityId::new(path.display().to_string())
}
