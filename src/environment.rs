//! Environment Resolver
//!
//! Pure functions computing the environment visible at a frame and the session
//! mapping that actions see.
//!
//! Keys are scoped by level:
//! - project: `project`, `project_<datakey>`
//! - silo: `silo`
//! - asset: `asset`, `hierarchy`, `asset_<datakey>`
//! - task: `task`
//!
//! A child frame never removes a key of its parent and never rewrites keys of a more
//! general scope. Data fields set to `null` contribute no key.

use crate::frame::FrameKind;
use crate::types::{Environment, SessionMap};
use serde_json::{Map, Value};

/// Prefix applied to upper-cased environment keys when materialising a session.
pub const SESSION_PREFIX: &str = "SESSION_";

/// Session key carrying the registered projects root.
pub const PROJECTS_ROOT_KEY: &str = "SESSION_PROJECTS";

/// Scope that owns `key`, or `None` for keys outside the hierarchy.
pub fn scope_of(key: &str) -> Option<FrameKind> {
    match key {
        "project" => Some(FrameKind::Project),
        "silo" => Some(FrameKind::Silo),
        "asset" | "hierarchy" => Some(FrameKind::Asset),
        "task" => Some(FrameKind::Task),
        _ if key.starts_with("project_") => Some(FrameKind::Project),
        _ if key.starts_with("asset_") => Some(FrameKind::Asset),
        _ => None,
    }
}

/// Render a document value as an environment string.
pub fn value_to_env_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Joined ancestor path of an asset: `data.hierarchy`, else `data.parents` joined by `/`.
pub fn hierarchy_of(data: &Map<String, Value>) -> Option<String> {
    if let Some(hierarchy) = data.get("hierarchy").and_then(Value::as_str) {
        return Some(hierarchy.to_string());
    }
    let parents = data.get("parents")?.as_array()?;
    let names: Vec<String> = parents.iter().map(value_to_env_string).collect();
    Some(names.join("/"))
}

/// Keys contributed by one level of the hierarchy.
pub fn scoped_keys(kind: FrameKind, name: &str, data: &Map<String, Value>) -> Environment {
    let mut keys = Environment::new();
    match kind {
        FrameKind::Project => {
            keys.insert("project".to_string(), name.to_string());
            for (key, value) in data.iter().filter(|(_, value)| !value.is_null()) {
                keys.insert(format!("project_{}", key), value_to_env_string(value));
            }
        }
        FrameKind::Silo => {
            keys.insert("silo".to_string(), name.to_string());
        }
        FrameKind::Asset => {
            keys.insert("asset".to_string(), name.to_string());
            if let Some(hierarchy) = hierarchy_of(data) {
                keys.insert("hierarchy".to_string(), hierarchy);
            }
            for (key, value) in data.iter().filter(|(_, value)| !value.is_null()) {
                keys.insert(format!("asset_{}", key), value_to_env_string(value));
            }
        }
        FrameKind::Task => {
            keys.insert("task".to_string(), name.to_string());
        }
    }
    keys
}

/// Environment of a child frame: the parent's plus the keys scoped to `kind`.
///
/// Keys of the same scope already present in the parent (an asset nested under an
/// asset) are layered: the child's values win, the parent's other keys stay. Keys of
/// more general scopes are left untouched.
pub fn resolve(
    parent: &Environment,
    kind: FrameKind,
    name: &str,
    data: &Map<String, Value>,
) -> Environment {
    let mut environment = parent.clone();

    for (key, value) in scoped_keys(kind, name, data) {
        let protected = environment.contains_key(&key)
            && scope_of(&key).map_or(true, |scope| scope.depth_rank() < kind.depth_rank());
        if !protected {
            environment.insert(key, value);
        }
    }
    environment
}

/// Session mapping for actions: `SESSION_<KEY>` for every environment key plus the
/// projects root.
pub fn materialize_session(environment: &Environment, projects_root: &str) -> SessionMap {
    let mut session: SessionMap = environment
        .iter()
        .map(|(key, value)| {
            (
                format!("{}{}", SESSION_PREFIX, key.to_uppercase()),
                value.clone(),
            )
        })
        .collect();
    session.insert(PROJECTS_ROOT_KEY.to_string(), projects_root.to_string());
    session
}

/// Replace `{name}` placeholders using `lookup`.
///
/// `{{` and `}}` produce literal braces. Placeholders `lookup` cannot fill are kept
/// verbatim and their names returned alongside the result.
pub fn substitute<F>(template: &str, lookup: F) -> (String, Vec<String>)
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut missing = Vec::new();
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
        } else if tail.starts_with('}') {
            out.push('}');
            rest = &tail[1..];
        } else {
            match tail[1..].find(['{', '}']) {
                Some(end) if tail.as_bytes()[end + 1] == b'}' => {
                    let key = &tail[1..end + 1];
                    match lookup(key) {
                        Some(value) => out.push_str(&value),
                        None => {
                            out.push_str(&tail[..end + 2]);
                            missing.push(key.to_string());
                        }
                    }
                    rest = &tail[end + 2..];
                }
                _ => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
    }
    out.push_str(rest);
    (out, missing)
}

/// Format `template` with whatever `values` provide, keeping unknown placeholders.
pub fn partial_format(template: &str, values: &Environment) -> String {
    substitute(template, |key| values.get(key).cloned()).0
}
