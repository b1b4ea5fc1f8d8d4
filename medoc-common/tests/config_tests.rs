//! Tests for configuration loading and root folder resolution
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate MEDOC_ROOT_FOLDER are marked with #[serial].

use medoc_common::config::{
    get_default_root_folder, load_config, load_toml_config, resolve_root_folder,
    write_toml_config, TomlConfig, ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
#[serial]
fn test_cli_argument_wins_over_everything() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/medoc-env-folder");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/medoc-toml-folder")),
        ..Default::default()
    };

    let resolved = resolve_root_folder(Some(Path::new("/tmp/medoc-cli-folder")), &config);
    assert_eq!(resolved, PathBuf::from("/tmp/medoc-cli-folder"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/medoc-env-folder");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/medoc-toml-folder")),
        ..Default::default()
    };

    let resolved = resolve_root_folder(None, &config);
    assert_eq!(resolved, PathBuf::from("/tmp/medoc-env-folder"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_toml_used_when_no_env() {
    env::remove_var(ROOT_FOLDER_ENV);
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/medoc-toml-folder")),
        ..Default::default()
    };

    let resolved = resolve_root_folder(None, &config);
    assert_eq!(resolved, PathBuf::from("/tmp/medoc-toml-folder"));
}

#[test]
#[serial]
fn test_default_root_folder_fallback() {
    env::remove_var(ROOT_FOLDER_ENV);
    let resolved = resolve_root_folder(None, &TomlConfig::default());
    assert_eq!(resolved, get_default_root_folder());
    assert!(!resolved.as_os_str().is_empty());
}

#[test]
fn test_write_then_load_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = TomlConfig::default();
    config.store.endpoint = Some("sqlite://docs.db".to_string());
    config.store.namespace = Some("imdb".to_string());
    config.store.collection = Some("movies".to_string());
    config.workers = Some(3);

    write_toml_config(&config, &path).unwrap();
    let loaded = load_toml_config(&path).unwrap();

    assert_eq!(loaded.store.endpoint.as_deref(), Some("sqlite://docs.db"));
    assert_eq!(loaded.store.collection.as_deref(), Some("movies"));
    assert_eq!(loaded.workers, Some(3));
    assert_eq!(loaded.logging.level, "info");
}

#[test]
fn test_explicit_missing_config_is_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");

    let err = load_config(Some(&missing)).unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
}

#[test]
fn test_malformed_config_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "workers = \"many\"").unwrap();

    assert!(load_toml_config(&path).is_err());
}
