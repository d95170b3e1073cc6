//! Navigating a directory-tree store

use crate::integration::test_utils::ROOT;
use launchpad::action::StaticRegistry;
use launchpad::config::{LauncherConfig, TaskDefinition};
use launchpad::error::StoreError;
use launchpad::frame::FrameKind;
use launchpad::navigation::Navigator;
use launchpad::session::Session;
use launchpad::store::{DocumentStore, FilesystemStore};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn layout() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("hulk/assets/hero/work/modeling")).unwrap();
    fs::create_dir_all(root.join("hulk/assets/hero/work/rigging")).unwrap();
    fs::create_dir_all(root.join("hulk/assets/tree")).unwrap();
    fs::create_dir_all(root.join("hulk/film/sh010")).unwrap();
    fs::create_dir_all(root.join("hulk/scratch/ignored")).unwrap();
    fs::create_dir_all(root.join(".trash/assets/old")).unwrap();
    fs::write(root.join("README"), "not a project").unwrap();
    temp_dir
}

fn silos() -> Vec<String> {
    vec!["assets".to_string(), "film".to_string()]
}

#[test]
fn test_scan_finds_projects_and_assets() {
    let temp_dir = layout();
    let store = FilesystemStore::scan(temp_dir.path(), &silos()).unwrap();

    let projects = store.projects().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "hulk");
    let silos = store
        .distinct(
            &launchpad::store::Query::assets().parent(projects[0].id.clone()),
            "silo",
        )
        .unwrap();
    assert_eq!(silos.len(), 2);
}

#[test]
fn test_missing_root_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nowhere");
    assert!(matches!(
        FilesystemStore::scan(&missing, &silos()),
        Err(StoreError::InvalidRoot(_))
    ));
}

#[test]
fn test_navigate_down_to_work_task() {
    let temp_dir = layout();
    let store = FilesystemStore::scan(temp_dir.path(), &silos()).unwrap();
    let mut config = LauncherConfig::default();
    config.tasks = vec![TaskDefinition::named("modeling"), TaskDefinition::named("lookdev")];

    let mut navigator = Navigator::new(Arc::new(store), Arc::new(StaticRegistry::new()), config);
    let mut session = Session::new(ROOT, None);
    navigator.init(&mut session).unwrap();

    navigator.push(&mut session, "hulk").unwrap();
    let silos: Vec<&str> = navigator.items().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(silos, ["assets", "film"]);

    navigator.push(&mut session, "assets").unwrap();
    let assets: Vec<&str> = navigator.items().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(assets, ["hero", "tree"]);

    navigator.push(&mut session, "hero").unwrap();
    let tasks: Vec<(&str, FrameKind)> = navigator
        .items()
        .iter()
        .map(|i| (i.name.as_str(), i.kind))
        .collect();
    assert_eq!(
        tasks,
        [("modeling", FrameKind::Task), ("rigging", FrameKind::Task)]
    );

    let frame = navigator.push(&mut session, "rigging").unwrap();
    assert_eq!(frame.environment["task"], "rigging");
    assert!(frame.environment["asset_path"].ends_with("hero"));
}
