use std::path::PathBuf;
use std::time::Duration;

use scantool::core::config::{Config, DEFAULT_MAX_EVENTS};
use tempfile::TempDir;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert!(config.imaging_tool_path.is_none());
    assert!(config.output_dir.is_none());
    assert_eq!(config.max_events, DEFAULT_MAX_EVENTS);
    assert!(config.imaging_timeout().is_none());
}

#[test]
fn test_config_defaults_sit_next_to_binary() {
    let config = Config::default();
    assert!(config.imaging_tool().ends_with("DumpIt.exe"));
    assert!(config.output_directory().ends_with("Output"));
}

#[test]
fn test_config_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("scantool").join("config.json");

    let mut config = Config::default();
    config.set_imaging_tool_path(PathBuf::from("/opt/forensics/DumpIt.exe"));
    config.set_output_dir(PathBuf::from("/cases/incident-7"));
    config.set_max_events(20).unwrap();
    config.set_imaging_timeout_secs(900);
    config.save_to(&config_path).unwrap();

    let loaded = Config::load_from(&config_path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.imaging_tool(), PathBuf::from("/opt/forensics/DumpIt.exe"));
    assert_eq!(loaded.imaging_timeout(), Some(Duration::from_secs(900)));
}

#[test]
fn test_config_partial_file_fills_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.json");
    std::fs::write(&config_path, r#"{ "output_dir": "/cases" }"#).unwrap();

    let loaded = Config::load_from(&config_path).unwrap();
    assert_eq!(loaded.output_directory(), PathBuf::from("/cases"));
    assert_eq!(loaded.max_events, DEFAULT_MAX_EVENTS);
    assert!(loaded.gateway_url().starts_with("https://"));
}

#[test]
fn test_config_corrupt_file_yields_default() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.json");
    std::fs::write(&config_path, "{ not json").unwrap();

    assert_eq!(Config::load_from(&config_path).unwrap(), Config::default());
}

#[test]
fn test_config_rejects_zero_max_events() {
    let mut config = Config::default();
    assert!(config.set_max_events(0).is_err());
    assert_eq!(config.max_events, DEFAULT_MAX_EVENTS);
}
