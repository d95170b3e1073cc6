//! Launching and supervising real processes

#![cfg(unix)]

use crate::integration::test_utils::{navigator_with, project_config, ROOT};
use launchpad::action::StaticRegistry;
use launchpad::config::AppDefinition;
use launchpad::error::LaunchError;
use launchpad::process::{EndReason, LaunchRequest, ProcessEvent, Supervisor};
use launchpad::store::{Entity, MemoryStore};
use launchpad::types::{Environment, ProcessId};
use std::time::{Duration, Instant};

fn os_environment() -> Environment {
    let mut environment = Environment::new();
    environment.insert("HOME".to_string(), "/users/me".to_string());
    if let Ok(path) = std::env::var("PATH") {
        environment.insert("PATH".to_string(), path);
    }
    environment
}

/// Output lines of `id` and its end event, waiting at most ten seconds.
fn collect(supervisor: &Supervisor, id: ProcessId) -> (Vec<String>, ProcessEvent) {
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut lines = Vec::new();
    while Instant::now() < deadline {
        match supervisor.next_event(Duration::from_millis(100)) {
            Some(ProcessEvent::Output { id: from, line }) if from == id => lines.push(line),
            Some(event) if event.id() == id && event.is_terminal() => return (lines, event),
            _ => {}
        }
    }
    panic!("process #{id} did not end in time");
}

#[test]
fn test_output_lines_then_single_end_event() {
    let supervisor = Supervisor::with_os_environment(os_environment());
    let id = supervisor
        .launch(&LaunchRequest::new("printf").with_args(["first\\nsecond\\n"]))
        .unwrap();

    let (lines, ended) = collect(&supervisor, id);
    assert_eq!(lines, ["first", "second"]);
    match ended {
        ProcessEvent::Ended {
            exit_code, reason, ..
        } => {
            assert_eq!(exit_code, Some(0));
            assert_eq!(reason, EndReason::Eof);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(supervisor.next_event(Duration::from_millis(200)).is_none());

    let record = supervisor.dismiss(id).unwrap();
    assert_eq!(record.output, ["first", "second"]);
    assert!(supervisor.record(id).is_none());
}

#[test]
fn test_launch_environment_expands_os_placeholders() {
    let supervisor = Supervisor::with_os_environment(os_environment());
    let mut environment = Environment::new();
    environment.insert("X".to_string(), "{HOME}/bin".to_string());
    let request = LaunchRequest::new("sh")
        .with_args(["-c", "echo $X"])
        .with_environment(environment);

    let id = supervisor.launch(&request).unwrap();
    let (lines, _) = collect(&supervisor, id);
    assert_eq!(lines, ["/users/me/bin"]);
}

#[test]
fn test_stderr_shares_the_output_stream() {
    let supervisor = Supervisor::with_os_environment(os_environment());
    let id = supervisor
        .launch(&LaunchRequest::new("sh").with_args(["-c", "echo out; echo err 1>&2; exit 3"]))
        .unwrap();
    let (mut lines, ended) = collect(&supervisor, id);
    lines.sort();
    assert_eq!(lines, ["err", "out"]);
    assert!(matches!(
        ended,
        ProcessEvent::Ended {
            exit_code: Some(3),
            ..
        }
    ));
    assert_eq!(supervisor.record(id).unwrap().status(), "ended");
}

#[test]
fn test_kill_then_dismiss() {
    let supervisor = Supervisor::with_os_environment(os_environment());
    let id = supervisor
        .launch(&LaunchRequest::new("sleep").with_args(["30"]))
        .unwrap();
    assert_eq!(supervisor.running(), 1);
    assert!(matches!(
        supervisor.dismiss(id),
        Err(LaunchError::StillRunning(_))
    ));

    supervisor.kill(id).unwrap();
    let (_, ended) = collect(&supervisor, id);
    assert!(matches!(
        ended,
        ProcessEvent::Ended {
            reason: EndReason::Killed,
            ..
        }
    ));
    assert_eq!(supervisor.running(), 0);
    supervisor.dismiss(id).unwrap();
    assert!(matches!(
        supervisor.kill(id),
        Err(LaunchError::ProcessNotFound(_))
    ));
}

#[test]
fn test_missing_executable_is_reported() {
    let supervisor = Supervisor::with_os_environment(os_environment());
    let err = supervisor
        .launch(&LaunchRequest::new("definitely-not-a-real-program"))
        .unwrap_err();
    assert!(matches!(err, LaunchError::ExecutableNotFound(_)));
    assert!(supervisor.records().is_empty());
}

#[test]
fn test_app_action_runs_with_session_environment() {
    let mut config = project_config();
    config.apps.push(AppDefinition {
        name: None,
        executable: "sh".to_string(),
        args: vec![
            "-c".to_string(),
            "echo $SESSION_PROJECT/$SESSION_TASK $SESSION_PROJECTS $GREETING".to_string(),
        ],
        label: Some("Shell".to_string()),
        icon: None,
        color: None,
        order: 0,
        environment: [("GREETING".to_string(), "hi from {HOME}".to_string())]
            .into_iter()
            .collect(),
    });
    let store = MemoryStore::new(vec![
        Entity::project("p1", "hulk").with_config(config),
        Entity::asset("a1", "hero", "p1").with_silo("assets"),
    ]);
    let (mut nav, mut session) = navigator_with(store, StaticRegistry::new());
    nav.push(&mut session, "hulk").unwrap();
    nav.push(&mut session, "assets").unwrap();
    nav.push(&mut session, "hero").unwrap();
    assert!(nav.actions().is_empty());
    nav.push(&mut session, "rigging").unwrap();
    assert_eq!(nav.actions()[0].name, "sh");
    assert_eq!(nav.actions()[0].label, "Shell");

    let supervisor = Supervisor::with_os_environment(os_environment());
    let id = nav
        .trigger(&session, &supervisor, "sh")
        .unwrap()
        .expect("app actions are monitored");
    let (lines, _) = collect(&supervisor, id);
    assert_eq!(lines, [format!("hulk/rigging {} hi from /users/me", ROOT)]);
    assert_eq!(supervisor.record(id).unwrap().label, "sh");
}
