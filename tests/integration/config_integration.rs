//! Integration tests for the configuration system

use launchpad::config::{validation_failure, ConfigLoader};
use launchpad::error::ApiError;
use tempfile::TempDir;

#[test]
fn test_workspace_config_file_is_layered_over_defaults() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join(".config"),
        r#"{
            "label": "Mindbender",
            "silos": ["assets", "film", "edit"],
            "tasks": [{"name": "modeling"}, {"name": "rigging", "icon": "bone"}],
            "apps": [
                {"executable": "/usr/bin/maya", "args": ["-proj", "{root}"], "order": 1}
            ],
            "required_environment": ["MAYA_LOCATION"]
        }"#,
    )
    .unwrap();

    let config = ConfigLoader::load(temp_dir.path()).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.label.as_deref(), Some("Mindbender"));
    assert_eq!(config.silos, ["assets", "film", "edit"]);
    assert_eq!(config.tasks[1].icon.as_deref(), Some("bone"));
    assert_eq!(config.apps[0].action_name(), "maya");
    assert_eq!(config.required_environment, ["MAYA_LOCATION"]);
    assert_eq!(config.logging.format, "text");

    let defaults = config.project_defaults();
    assert_eq!(defaults.tasks, config.tasks);
    assert!(defaults.template.is_empty());
}

#[test]
fn test_duplicate_definitions_fail_validation() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("launcher.json");
    std::fs::write(
        &config_file,
        r#"{
            "tasks": [{"name": "modeling"}, {"name": "modeling"}],
            "apps": [{"executable": "maya"}, {"name": "maya", "executable": "other"}]
        }"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 2);

    match validation_failure(&errors) {
        ApiError::ConfigError(message) => {
            assert!(message.contains("Task 'modeling': Duplicate task name"));
            assert!(message.contains("App 'maya': Duplicate app name"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_malformed_config_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("broken.json");
    std::fs::write(&config_file, "{ not json").unwrap();
    assert!(ConfigLoader::load_from_file(&config_file).is_err());
}
