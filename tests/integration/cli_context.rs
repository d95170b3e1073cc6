//! Shell commands driven against a demo run context

use crate::integration::test_utils::selections;
use launchpad::cli::{
    check_environment, execute_line, required_variables, Commands, RunContext, ShellReply,
    PROJECTS_ENV,
};
use launchpad::config::LauncherConfig;
use launchpad::demo::{demo_registry, demo_store, DEMO_ROOT};
use launchpad::error::{ApiError, NavigationError};
use launchpad::process::Supervisor;
use launchpad::session::Session;
use launchpad::types::Environment;
use std::sync::Arc;

fn demo_context() -> RunContext {
    RunContext::from_parts(
        LauncherConfig::default(),
        Arc::new(demo_store()),
        Arc::new(demo_registry()),
        Session::new(DEMO_ROOT, Some("Demo".to_string())),
        Supervisor::with_os_environment(Environment::new()),
    )
    .unwrap()
}

fn output(context: &mut RunContext, line: &str) -> String {
    match execute_line(context, line).unwrap() {
        ShellReply::Output(text) => text,
        ShellReply::Quit => panic!("'{line}' quit the shell"),
    }
}

#[test]
fn test_listing_at_root_shows_visible_projects() {
    let mut context = demo_context();
    let listing = output(&mut context, "ls");
    assert!(listing.contains("Demo Launcher"));
    assert!(listing.contains("hulk"));
    assert!(listing.contains("ant"));
    assert!(!listing.contains("archive"));
    assert!(listing.contains("announce"));
}

#[test]
fn test_cd_and_back_through_the_shell() {
    let mut context = demo_context();
    output(&mut context, "cd hulk");
    output(&mut context, "cd film");
    let listing = output(&mut context, "cd sh010");
    assert!(listing.contains("animation"));
    assert_eq!(context.navigator().breadcrumbs(), ["hulk", "film", "sh010"]);

    let env = output(&mut context, "env");
    assert!(env.contains("asset_label"));
    assert!(env.contains("Shot 010"));

    output(&mut context, "cd ..");
    assert_eq!(context.navigator().depth(), 2);

    let reply = output(&mut context, "back 9");
    assert!(reply.contains("Returned to root"));
    assert_eq!(context.navigator().depth(), 0);
    assert_eq!(context.navigator().page_depth(), 1);
}

#[test]
fn test_invalid_selection_surfaces_as_error() {
    let mut context = demo_context();
    let err = execute_line(&mut context, "cd nowhere").unwrap_err();
    assert!(matches!(
        err,
        ApiError::Navigation(NavigationError::InvalidSelection { .. })
    ));
    assert_eq!(context.navigator().depth(), 0);
}

#[test]
fn test_unknown_command_and_quit() {
    let mut context = demo_context();
    assert!(output(&mut context, "frobnicate").contains("frobnicate"));
    assert!(matches!(
        execute_line(&mut context, "quit").unwrap(),
        ShellReply::Quit
    ));
}

#[test]
fn test_workdir_follows_template() {
    let mut context = demo_context();
    assert!(output(&mut context, "workdir").contains(DEMO_ROOT));
    context
        .navigate(&selections(&["hulk", "assets", "hero", "modeling"]))
        .unwrap();
    let workdir = output(&mut context, "workdir");
    assert!(workdir.contains("hulk/assets/hero/work/modeling"));
}

#[test]
fn test_completed_action_runs_without_process() {
    let mut context = demo_context();
    assert_eq!(output(&mut context, "run announce"), "announce completed");
    assert!(output(&mut context, "ps").contains("No processes"));
}

#[test]
fn test_browse_json_lists_silo_less_children() {
    let mut context = demo_context();
    let json = context
        .execute(&Commands::Browse {
            path: selections(&["ant", "seq01"]),
            format: "json".to_string(),
        })
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["breadcrumbs"], serde_json::json!(["ant", "seq01"]));
    let names: Vec<&str> = value["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|item| item["type"] == "asset")
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["sh010", "sh020"]);
}

#[test]
fn test_startup_environment_check() {
    let config = LauncherConfig {
        required_environment: vec!["MAYA_LOCATION".to_string()],
        ..LauncherConfig::default()
    };
    let required = required_variables(&config, false);
    assert_eq!(required, [PROJECTS_ENV, "MAYA_LOCATION"]);

    let err = check_environment(&required, |_| None).unwrap_err();
    match err {
        ApiError::MissingEnvironment(missing) => assert_eq!(missing.len(), 2),
        other => panic!("unexpected error: {other}"),
    }
    assert!(check_environment(&required_variables(&LauncherConfig::default(), true), |_| None).is_ok());
}
