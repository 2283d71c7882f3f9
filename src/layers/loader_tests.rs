//! Tests for loading the resolved configuration.

use std::fs;

use serde_json::json;
use tempfile::TempDir;

use super::{ConfigLoader, LayerError};

#[test]
fn overlay_overrides_base() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.yml"),
        "db:\n    host: h\n    port: 5432\ndebug: true\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("config.prod.yml"),
        "db:\n    port: 5433\ndebug: false\n",
    )
    .unwrap();

    let value = ConfigLoader::new(dir.path(), "prod").load().unwrap();
    assert_eq!(
        value,
        json!({"db": {"host": "h", "port": 5433}, "debug": false})
    );
}

#[test]
fn context_without_overlay_uses_base_only() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.yml"), "x: 1\n").unwrap();

    let value = ConfigLoader::new(dir.path(), "staging").load().unwrap();
    assert_eq!(value, json!({"x": 1}));
}

#[test]
fn no_layers_load_as_empty_mapping() {
    let dir = TempDir::new().unwrap();
    let value = ConfigLoader::new(dir.path(), "prod").load().unwrap();
    assert_eq!(value, json!({}));
}

#[test]
fn loading_twice_gives_equal_values() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.yml"), "b: 1\na: [1, 2]\n").unwrap();

    let loader = ConfigLoader::new(dir.path(), "prod");
    assert_eq!(loader.load().unwrap(), loader.load().unwrap());
}

#[test]
fn picks_up_changes_between_loads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yml");
    fs::write(&path, "a: 1\n").unwrap();

    let loader = ConfigLoader::new(dir.path(), "prod");
    assert_eq!(loader.load().unwrap(), json!({"a": 1}));

    fs::write(&path, "a: 2\n").unwrap();
    assert_eq!(loader.load().unwrap(), json!({"a": 2}));
}

#[test]
fn parse_errors_propagate() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.prod.yml"), "a: {\n").unwrap();

    let result = ConfigLoader::new(dir.path(), "prod").load();
    assert!(matches!(result, Err(LayerError::Parse { .. })));
}
