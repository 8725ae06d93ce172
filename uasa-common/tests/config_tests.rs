//! Configuration file discovery tests
//!
//! Uses serial_test because UASA_CONFIG is process-wide state.

use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;
use uasa_common::config::{Config, ConfigOverrides, TomlConfig, CONFIG_ENV_VAR, DEFAULT_BIND};
use uasa_common::Error;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
#[serial]
fn test_explicit_config_file_is_read() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "bind = \"0.0.0.0:4000\"\nbody_limit_bytes = 1024\n");

    let config = Config::load(ConfigOverrides {
        config_file: Some(path),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(config.bind, "0.0.0.0:4000");
    assert_eq!(config.body_limit_bytes, 1024);
}

#[test]
#[serial]
fn test_env_var_names_config_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "static_dir = \"/srv/www\"\n");
    env::set_var(CONFIG_ENV_VAR, &path);

    let config = Config::load(ConfigOverrides::default()).unwrap();
    assert_eq!(config.static_dir, PathBuf::from("/srv/www"));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_explicit_config_file_is_error() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist.toml");

    let result = Config::load(ConfigOverrides {
        config_file: Some(missing.clone()),
        ..Default::default()
    });
    match result {
        Err(Error::Config(msg)) => assert!(msg.contains("does-not-exist.toml")),
        other => panic!("Expected Config error, got {:?}", other),
    }

    env::set_var(CONFIG_ENV_VAR, &missing);
    let result = Config::load(ConfigOverrides::default());
    env::remove_var(CONFIG_ENV_VAR);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_resolve_without_file_uses_defaults() {
    env::remove_var(CONFIG_ENV_VAR);

    let config = Config::resolve(ConfigOverrides::default(), TomlConfig::default()).unwrap();

    assert_eq!(config.bind, DEFAULT_BIND);
    assert_eq!(config.subjects.len(), 13);
    assert_eq!(config.config_file, None);
}

#[test]
#[serial]
fn test_unparsable_config_file_is_error() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "subjects = \"bm\"\n");

    let result = Config::load(ConfigOverrides {
        config_file: Some(path),
        ..Default::default()
    });
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_cli_override_beats_config_file() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "database_path = \"/from/toml.db\"\n");

    let config = Config::load(ConfigOverrides {
        config_file: Some(path),
        database_path: Some(PathBuf::from("/from/cli.db")),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(config.database_path, PathBuf::from("/from/cli.db"));
}
