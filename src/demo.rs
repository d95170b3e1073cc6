//! Demo mode
//!
//! A small built-in studio so the launcher can be explored without a store: one
//! project partitioned into silos and one older project without silos whose assets
//! nest through `visualParent`.

use crate::action::{Action, ActionContext, ActionOutcome, StaticRegistry};
use crate::config::{AppDefinition, ProjectConfig, TaskDefinition};
use crate::error::LaunchError;
use crate::process::{spawn, LaunchRequest};
use crate::session::SessionKey;
use crate::store::{Entity, MemoryStore};
use crate::types::SessionMap;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::info;

/// Projects root reported by the demo session.
pub const DEMO_ROOT: &str = "/demo/projects";

fn shell(script: &str) -> (String, Vec<String>) {
    if cfg!(windows) {
        ("cmd".to_string(), vec!["/C".to_string(), script.to_string()])
    } else {
        ("sh".to_string(), vec!["-c".to_string(), script.to_string()])
    }
}

fn task(name: &str, icon: Option<&str>) -> TaskDefinition {
    let mut task = TaskDefinition::named(name);
    task.icon = icon.map(str::to_string);
    task
}

fn project_config() -> ProjectConfig {
    let (executable, args) = if cfg!(windows) {
        shell("echo Working on %SESSION_ASSET% / %SESSION_TASK% in %DEMO_STUDIO%")
    } else {
        shell("echo Working on $SESSION_ASSET / $SESSION_TASK in $DEMO_STUDIO")
    };
    ProjectConfig {
        tasks: vec![
            task("modeling", Some("cube")),
            task("rigging", None),
            task("lookdev", Some("paint-brush")),
            task("animation", None),
        ],
        apps: vec![AppDefinition {
            name: Some("shell".to_string()),
            executable,
            args,
            label: Some("Shell".to_string()),
            icon: Some("terminal".to_string()),
            color: Some("#5cb85c".to_string()),
            order: 0,
            environment: BTreeMap::from([(
                "DEMO_STUDIO".to_string(),
                "{USER} at the demo studio".to_string(),
            )]),
        }],
        template: BTreeMap::from([(
            "work".to_string(),
            "{root}/{project}/{silo}/{asset}/work/{task}".to_string(),
        )]),
    }
}

/// Built-in document store.
pub fn demo_store() -> MemoryStore {
    MemoryStore::new(vec![
        Entity::project("hulk", "hulk")
            .with_data("fps", json!(24))
            .with_data("resolution", json!("1920x1080"))
            .with_config(project_config()),
        Entity::asset("hulk-hero", "hero", "hulk")
            .with_silo("assets")
            .with_data("group", json!("characters"))
            .with_data("parents", json!(["characters"])),
        Entity::asset("hulk-villain", "villain", "hulk")
            .with_silo("assets")
            .with_data("group", json!("characters"))
            .with_data("parents", json!(["characters"])),
        Entity::asset("hulk-tree", "tree", "hulk")
            .with_silo("assets")
            .with_data("group", json!("props"))
            .with_data("tasks", json!(["modeling", "lookdev"])),
        Entity::asset("hulk-sh010", "sh010", "hulk")
            .with_silo("film")
            .with_data("label", json!("Shot 010"))
            .with_data("tasks", json!(["animation", "lighting"])),
        Entity::asset("hulk-sh020", "sh020", "hulk")
            .with_silo("film")
            .with_data("visible", json!(false)),
        Entity::project("ant", "ant")
            .with_data("fps", json!(25))
            .with_config(project_config()),
        Entity::asset("ant-seq01", "seq01", "ant").with_data("visualParent", json!(null)),
        Entity::asset("ant-sh010", "sh010", "ant")
            .with_data("visualParent", json!("ant-seq01"))
            .with_data("parents", json!(["seq01"])),
        Entity::asset("ant-sh020", "sh020", "ant")
            .with_data("visualParent", json!("ant-seq01"))
            .with_data("parents", json!(["seq01"])),
        Entity::project("archive", "archive").with_data("visible", json!(false)),
    ])
}

#[derive(Debug, Clone, Copy)]
enum DemoCommand {
    PrintSession,
    Countdown,
    Announce,
}

/// Demo action gated on session keys
#[derive(Debug, Clone)]
pub struct DemoAction {
    name: &'static str,
    label: &'static str,
    icon: &'static str,
    order: i32,
    requires: &'static [SessionKey],
    command: DemoCommand,
}

impl Action for DemoAction {
    fn name(&self) -> &str {
        self.name
    }

    fn label(&self) -> Option<&str> {
        Some(self.label)
    }

    fn icon(&self) -> Option<&str> {
        Some(self.icon)
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn is_compatible(&self, session: &SessionMap) -> bool {
        self.requires
            .iter()
            .all(|key| session.contains_key(key.env_name()))
    }

    fn process(&self, context: &ActionContext<'_>) -> Result<ActionOutcome, LaunchError> {
        let script = match self.command {
            DemoCommand::Announce => {
                info!(
                    project = context.session.get("SESSION_PROJECT").map(String::as_str),
                    "Hello from the demo studio"
                );
                return Ok(ActionOutcome::Completed);
            }
            DemoCommand::PrintSession if cfg!(windows) => "set SESSION_",
            DemoCommand::PrintSession => "env | grep '^SESSION_' | sort",
            DemoCommand::Countdown if cfg!(windows) => {
                "for /L %i in (5,-1,1) do @(echo %i & ping -n 2 127.0.0.1 >nul)"
            }
            DemoCommand::Countdown => "for i in 5 4 3 2 1; do echo $i; sleep 1; done; echo liftoff",
        };
        let (executable, args) = shell(script);
        let request = LaunchRequest::new(executable)
            .with_args(args)
            .with_environment(context.session.clone())
            .with_label(self.name);
        spawn(&request, context.os_environment).map(ActionOutcome::Spawned)
    }
}

/// Registry holding the demo actions.
pub fn demo_registry() -> StaticRegistry {
    StaticRegistry::new()
        .with(DemoAction {
            name: "announce",
            label: "Announce",
            icon: "bullhorn",
            order: 0,
            requires: &[],
            command: DemoCommand::Announce,
        })
        .with(DemoAction {
            name: "session",
            label: "Print session",
            icon: "list",
            order: 1,
            requires: &[SessionKey::Project],
            command: DemoCommand::PrintSession,
        })
        .with(DemoAction {
            name: "countdown",
            label: "Countdown",
            icon: "clock-o",
            order: 2,
            requires: &[SessionKey::Project, SessionKey::Asset],
            command: DemoCommand::Countdown,
        })
}
