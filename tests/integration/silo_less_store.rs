//! Stores without silo partitioning, nested through `visualParent`

use crate::integration::test_utils::{navigator_with, project_config};
use launchpad::action::StaticRegistry;
use launchpad::frame::FrameKind;
use launchpad::store::{Entity, MemoryStore};
use serde_json::json;

fn store() -> MemoryStore {
    MemoryStore::new(vec![
        Entity::project("p1", "ant").with_config(project_config()),
        Entity::asset("A1", "seq01", "p1")
            .with_data("visualParent", json!(null))
            .with_data("fps", json!(24)),
        Entity::asset("A2", "sh010", "p1").with_data("visualParent", json!("A1")),
    ])
}

fn names(items: &[launchpad::model::ListItem]) -> Vec<&str> {
    items.iter().map(|item| item.name.as_str()).collect()
}

#[test]
fn test_project_goes_straight_to_assets() {
    let (mut nav, mut session) = navigator_with(store(), StaticRegistry::new());
    nav.push(&mut session, "ant").unwrap();
    assert_eq!(names(nav.items()), ["seq01"]);
    assert!(nav.items().iter().all(|item| item.kind == FrameKind::Asset));
}

#[test]
fn test_visual_children_listed_under_parent() {
    let (mut nav, mut session) = navigator_with(store(), StaticRegistry::new());
    nav.push(&mut session, "ant").unwrap();
    let frame = nav.push(&mut session, "A1").unwrap();
    assert_eq!(frame.kind, FrameKind::Asset);
    assert!(!frame.environment.contains_key("silo"));

    let assets: Vec<&str> = nav
        .items()
        .iter()
        .filter(|item| item.kind == FrameKind::Asset)
        .map(|item| item.name.as_str())
        .collect();
    assert_eq!(assets, ["sh010"]);
    assert_eq!(names(nav.items()), ["sh010", "modeling", "rigging"]);
}

#[test]
fn test_nested_asset_layers_over_parent_keys() {
    let (mut nav, mut session) = navigator_with(store(), StaticRegistry::new());
    nav.push(&mut session, "ant").unwrap();
    nav.push(&mut session, "seq01").unwrap();
    let parent = nav.current_frame().unwrap();
    assert!(!parent.environment.contains_key("asset_visualParent"));
    let frame = nav.push(&mut session, "sh010").unwrap();

    assert_eq!(frame.environment["asset"], "sh010");
    assert_eq!(frame.environment["asset_fps"], "24");
    assert_eq!(frame.environment["asset_visualParent"], "A1");
    assert_eq!(frame.environment["project"], "ant");
    assert_eq!(nav.breadcrumbs(), ["ant", "seq01", "sh010"]);
}

#[test]
fn test_store_without_any_silo_field() {
    let store = MemoryStore::new(vec![
        Entity::project("p1", "ant"),
        Entity::asset("x", "loose", "p1"),
    ]);
    let (mut nav, mut session) = navigator_with(store, StaticRegistry::new());
    nav.push(&mut session, "ant").unwrap();
    assert_eq!(names(nav.items()), ["loose"]);
}
