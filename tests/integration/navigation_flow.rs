//! Navigation through a silo-partitioned store

use crate::integration::test_utils::{navigator_with, silo_store, Probe, ROOT};
use launchpad::action::StaticRegistry;
use launchpad::error::NavigationError;
use launchpad::frame::FrameKind;
use launchpad::navigation::{NavigationEvent, PopTarget};
use launchpad::session::SessionKey;

#[test]
fn test_project_push_lists_silos() {
    let (mut nav, mut session) = navigator_with(silo_store(), StaticRegistry::new());
    let frame = nav.push(&mut session, "hulk").unwrap();

    assert_eq!(frame.kind, FrameKind::Project);
    assert_eq!(frame.environment["project"], "hulk");
    assert_eq!(frame.environment["project_code"], "HLK");
    let items: Vec<(&str, FrameKind)> = nav
        .items()
        .iter()
        .map(|item| (item.name.as_str(), item.kind))
        .collect();
    assert_eq!(
        items,
        [("assets", FrameKind::Silo), ("film", FrameKind::Silo)]
    );
    assert_eq!(session.get(SessionKey::Project), Some("hulk"));
}

#[test]
fn test_hidden_assets_are_not_listed() {
    let (mut nav, mut session) = navigator_with(silo_store(), StaticRegistry::new());
    nav.push(&mut session, "hulk").unwrap();
    nav.push(&mut session, "assets").unwrap();
    let names: Vec<&str> = nav.items().iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, ["hero"]);
}

#[test]
fn test_full_descent_and_pop_round_trip() {
    let (mut nav, mut session) = navigator_with(silo_store(), StaticRegistry::new());
    for selection in ["hulk", "assets", "hero", "rigging"] {
        nav.push(&mut session, selection).unwrap();
        assert_eq!(nav.breadcrumbs().len(), nav.depth());
        assert_eq!(nav.page_depth(), nav.depth() + 1);
    }

    let frame = nav.current_frame().unwrap();
    assert_eq!(frame.kind, FrameKind::Task);
    assert_eq!(frame.environment["task"], "rigging");
    assert_eq!(frame.environment["silo"], "assets");
    assert_eq!(frame.environment["hierarchy"], "characters");
    assert_eq!(session.get(SessionKey::Hierarchy), Some("characters"));

    for _ in 0..4 {
        let outcome = nav.pop(&mut session, PopTarget::Back).unwrap();
        assert_eq!(outcome.popped, 1);
        assert!(!outcome.returned_to_root);
    }
    assert_eq!(nav.depth(), 0);
    assert!(nav.current_frame().is_none());
    assert_eq!(session.get(SessionKey::Project), None);
    assert_eq!(session.projects_root(), ROOT);
}

#[test]
fn test_pop_past_root_reinitialises_once() {
    let (mut nav, mut session) = navigator_with(silo_store(), StaticRegistry::new());
    nav.drain_events();

    let outcome = nav.pop(&mut session, PopTarget::Back).unwrap();
    assert!(outcome.returned_to_root);
    assert_eq!(outcome.popped, 0);
    assert_eq!(nav.depth(), 0);
    assert_eq!(nav.items().len(), 1);

    let events = nav.drain_events();
    assert_eq!(
        events,
        [
            NavigationEvent::Pushed("Root".to_string()),
            NavigationEvent::ReturnedToRoot
        ]
    );
}

#[test]
fn test_refresh_from_depth() {
    let (mut nav, mut session) = navigator_with(silo_store(), StaticRegistry::new());
    nav.push(&mut session, "hulk").unwrap();
    nav.push(&mut session, "film").unwrap();

    let outcome = nav.pop(&mut session, PopTarget::Refresh).unwrap();
    assert_eq!(outcome.popped, 2);
    assert!(outcome.returned_to_root);
    assert_eq!(nav.page_depth(), 1);
    assert_eq!(nav.items()[0].name, "hulk");
}

#[test]
fn test_breadcrumb_index_beyond_depth_is_a_no_op() {
    let (mut nav, mut session) = navigator_with(silo_store(), StaticRegistry::new());
    nav.push(&mut session, "hulk").unwrap();
    let outcome = nav.pop(&mut session, PopTarget::Breadcrumb(5)).unwrap();
    assert_eq!(outcome.popped, 0);
    assert_eq!(nav.depth(), 1);
}

#[test]
fn test_selection_outside_current_scope_is_rejected() {
    let (mut nav, mut session) = navigator_with(silo_store(), StaticRegistry::new());
    nav.push(&mut session, "hulk").unwrap();
    nav.push(&mut session, "film").unwrap();

    let err = nav.push(&mut session, "hero").unwrap_err();
    match err {
        NavigationError::InvalidSelection { selection, scope } => {
            assert_eq!(selection, "hero");
            assert_eq!(scope, "silo 'film'");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(nav.breadcrumbs(), ["hulk", "film"]);
}

#[test]
fn test_actions_page_follows_depth() {
    let registry = StaticRegistry::new()
        .with(Probe::new("anywhere", 0, &[]))
        .with(Probe::new("in-project", 0, &["SESSION_PROJECT"]))
        .with(Probe::new("on-task", 0, &["SESSION_TASK"]));
    let (mut nav, mut session) = navigator_with(silo_store(), registry);

    let names = |nav: &launchpad::navigation::Navigator| -> Vec<String> {
        nav.actions().iter().map(|a| a.name.clone()).collect()
    };
    assert_eq!(names(&nav), ["anywhere"]);

    nav.push(&mut session, "hulk").unwrap();
    assert_eq!(names(&nav), ["anywhere", "in-project"]);

    nav.push(&mut session, "assets").unwrap();
    nav.push(&mut session, "hero").unwrap();
    nav.push(&mut session, "modeling").unwrap();
    assert_eq!(names(&nav), ["anywhere", "in-project", "on-task"]);

    nav.pop(&mut session, PopTarget::Back).unwrap();
    assert_eq!(names(&nav), ["anywhere", "in-project"]);
}
