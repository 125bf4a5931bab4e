//! Integration tests for Settings config loading with layered precedence.
//!
//! Note: These tests run without a global config (temp directories only),
//! so they effectively test local config merging with defaults. They do
//! not touch `VARTREE_*` variables, which would leak across parallel tests.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use vartree::application::ApplicationError;
use vartree::config::{local_config_path, Settings};

// ============================================================
// Settings::load() tests
// ============================================================

#[test]
fn given_no_local_config_when_load_then_defaults() {
    // Arrange
    let project = TempDir::new().unwrap();

    // Act
    let settings = Settings::load(Some(project.path())).expect("load settings");

    // Assert
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.store_path, PathBuf::from("variables.json"));
    assert_eq!(settings.separator, "/");
}

#[test]
fn given_local_config_when_load_then_overrides_defaults() {
    // Arrange
    let project = TempDir::new().unwrap();
    let local = r#"
separator = "."
default_collection = "Semantic"
skip_unnamed = true
"#;
    fs::write(local_config_path(project.path()), local).unwrap();

    // Act
    let settings = Settings::load(Some(project.path())).expect("load settings");

    // Assert
    assert_eq!(settings.separator, ".");
    assert_eq!(settings.default_collection.as_deref(), Some("Semantic"));
    assert!(settings.skip_unnamed);
    assert_eq!(settings.store_path, PathBuf::from("variables.json"));
}

#[test]
fn given_relative_store_path_in_local_config_when_load_then_anchored_at_project() {
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        "store_path = \"tokens/vars.json\"\n",
    )
    .unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert_eq!(
        settings.store_path,
        project.path().join("tokens").join("vars.json")
    );
}

#[test]
fn given_empty_separator_when_load_then_config_error() {
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), "separator = \"\"\n").unwrap();

    let result = Settings::load(Some(project.path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_malformed_local_config_when_load_then_config_error() {
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), "separator = [unclosed\n").unwrap();

    let result = Settings::load(Some(project.path()));

    match result {
        Err(ApplicationError::Config { message }) => {
            assert!(message.contains(".vartree.toml"), "message: {}", message)
        }
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn given_settings_when_rendering_toml_then_keys_present() {
    let settings = Settings {
        default_collection: Some("Primitives".to_string()),
        ..Settings::default()
    };

    let rendered = settings.to_toml().unwrap();

    assert!(rendered.contains("separator = \"/\""));
    assert!(rendered.contains("default_collection = \"Primitives\""));
}
