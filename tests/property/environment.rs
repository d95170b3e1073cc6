//! Property-based tests for environment resolution

use launchpad::environment::{resolve, scope_of, substitute};
use launchpad::frame::FrameKind;
use launchpad::types::Environment;
use proptest::prelude::*;
use serde_json::{Map, Value};

fn data_strategy() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-z]{1,8}", prop::option::of("[a-zA-Z0-9 ]{0,12}"), 0..6)
        .prop_map(|entries| {
            entries
                .into_iter()
                .map(|(key, value)| (key, value.map_or(Value::Null, Value::String)))
                .collect()
        })
}

/// A child frame keeps every key of its parent, and every more general value untouched
#[test]
fn test_child_environment_is_monotonic() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                data_strategy(),
                data_strategy(),
                data_strategy(),
                "[a-z]{1,8}",
                "[a-z]{1,8}",
            ),
            |(project_data, asset_data, nested_data, asset, nested)| {
                let root = Environment::new();
                let project = resolve(&root, FrameKind::Project, "p", &project_data);
                let silo = resolve(&project, FrameKind::Silo, "assets", &Map::new());
                let first = resolve(&silo, FrameKind::Asset, &asset, &asset_data);
                let second = resolve(&first, FrameKind::Asset, &nested, &nested_data);
                let task = resolve(&second, FrameKind::Task, "modeling", &Map::new());

                for (parent, child, kind) in [
                    (&root, &project, FrameKind::Project),
                    (&project, &silo, FrameKind::Silo),
                    (&silo, &first, FrameKind::Asset),
                    (&first, &second, FrameKind::Asset),
                    (&second, &task, FrameKind::Task),
                ] {
                    for (key, value) in parent {
                        prop_assert!(child.contains_key(key), "lost {}", key);
                        let general = scope_of(key)
                            .map_or(true, |scope| scope.depth_rank() < kind.depth_rank());
                        if general {
                            prop_assert_eq!(child.get(key), Some(value));
                        }
                    }
                }

                prop_assert_eq!(second.get("asset"), Some(&nested));
                for (key, value) in &nested_data {
                    let env_key = format!("asset_{}", key);
                    match value.as_str() {
                        Some(text) => prop_assert_eq!(second.get(&env_key).map(String::as_str), Some(text)),
                        None => prop_assert_eq!(second.get(&env_key), first.get(&env_key)),
                    }
                }
                Ok(())
            },
        )
        .unwrap();
}

/// Text without braces passes through substitution unchanged
#[test]
fn test_substitute_without_placeholders_is_identity() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&"[^{}]{0,40}", |template| {
            let (out, missing) = substitute(&template, |_| Some("x".to_string()));
            prop_assert_eq!(out, template);
            prop_assert!(missing.is_empty());
            Ok(())
        })
        .unwrap();
}

/// Known placeholders are replaced and unknown ones kept verbatim
#[test]
fn test_substitute_known_and_unknown() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &("[A-Z]{1,8}", "[^{}]{0,20}", "[a-z]{1,8}"),
            |(key, value, unknown)| {
                let template = format!("{{{}}}/{{{}}}", key, unknown);
                let (out, missing) =
                    substitute(&template, |name| (name == key).then(|| value.clone()));
                prop_assert_eq!(out, format!("{}/{{{}}}", value, unknown));
                prop_assert_eq!(missing, vec![unknown]);
                Ok(())
            },
        )
        .unwrap();
}
