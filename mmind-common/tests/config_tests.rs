//! Configuration file loading and resolution
//!
//! Tests that write config files use `tempfile` so they never touch the
//! user's real configuration directory.

use mmind_common::config::{
    load_toml_config, CompiledDefaults, ConfigOverrides, ServiceConfig, TomlConfig,
};
use mmind_common::Error;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_compiled_defaults_for_current_platform() {
    let defaults = CompiledDefaults::for_current_platform();

    assert!(!defaults.database_path.as_os_str().is_empty());
    assert_eq!(defaults.log_level, "info");
    assert!(defaults.database_path.ends_with("meetingmind.db"));
}

#[test]
fn test_missing_config_file_is_not_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("does-not-exist.toml");

    let loaded = load_toml_config(&path).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn test_full_config_file_parses() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mmind-tr.toml");
    std::fs::write(
        &path,
        r#"
database_path = "/var/lib/meetingmind/meetingmind.db"
port = 6001
bind = "0.0.0.0"

[transcription]
service_url = "http://whisper.internal:8000"
timeout_secs = 120

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = load_toml_config(&path).unwrap().expect("config should load");

    assert_eq!(config.port, Some(6001));
    assert_eq!(config.bind.as_deref(), Some("0.0.0.0"));
    assert_eq!(
        config.transcription.service_url.as_deref(),
        Some("http://whisper.internal:8000")
    );
    assert_eq!(config.transcription.timeout_secs, Some(120));
    assert_eq!(config.logging.level.as_deref(), Some("debug"));
}

#[test]
fn test_partial_config_file_parses() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mmind-tr.toml");
    std::fs::write(&path, "port = 7100\n").unwrap();

    let config = load_toml_config(&path).unwrap().unwrap();

    assert_eq!(
        config,
        TomlConfig {
            port: Some(7100),
            ..Default::default()
        }
    );
}

#[test]
fn test_malformed_config_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mmind-tr.toml");
    std::fs::write(&path, "port = \"not a number\"\n").unwrap();

    let result = load_toml_config(&path);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_toml_values_used_when_no_overrides() {
    let toml = TomlConfig {
        database_path: Some(PathBuf::from("/data/mm.db")),
        bind: Some("0.0.0.0".to_string()),
        ..Default::default()
    };
    let defaults = CompiledDefaults {
        database_path: PathBuf::from("/default/mm.db"),
        config_path: None,
        log_level: "info".to_string(),
    };

    let config = ServiceConfig::resolve(ConfigOverrides::default(), Some(toml), &defaults).unwrap();

    assert_eq!(config.database_path, PathBuf::from("/data/mm.db"));
    assert_eq!(config.bind, "0.0.0.0");
    assert_eq!(config.transcription_timeout, Duration::from_secs(600));
}
