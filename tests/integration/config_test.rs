use litemon::core::config::Config;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.refresh_ms, 1000);
    assert!(config.is_any_enabled("CPU"));
    assert_eq!(config.driver.mirrors.len(), 3);
    assert_eq!(config.driver.attempt_timeout_secs, 10);
    assert_eq!(config.driver.min_valid_size, 1024);
}

#[test]
fn test_config_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.json");

    let mut config = Config::default();
    config.refresh_ms = 500;
    config.enabled_items = vec!["MEM.Load".to_string()];
    config.driver.mirrors = vec!["https://mirror.test/driver.exe".to_string()];
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.refresh_ms, 500);
    assert_eq!(loaded.enabled_items, vec!["MEM.Load".to_string()]);
    assert_eq!(loaded.driver.mirrors, vec!["https://mirror.test/driver.exe".to_string()]);
    assert!(!loaded.is_any_enabled("CPU"));
}

#[test]
fn test_partial_config_keeps_driver_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, r#"{ "refresh_ms": 250, "driver": { "attempt_timeout_secs": 3 } }"#).unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.refresh_ms, 250);
    assert_eq!(config.driver.attempt_timeout_secs, 3);
    assert_eq!(config.driver.min_valid_size, 1024);
    assert_eq!(config.driver.user_agent, "LiteMon-AutoUpdater");
    assert_eq!(config.driver.installer_args, vec!["-install", "-silent"]);
}

#[test]
fn test_corrupt_config_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.refresh_ms, 1000);
}

#[test]
fn test_artifact_lands_in_temp_dir() {
    let config = Config::default();
    let path = config.driver.artifact_path();
    assert_eq!(path.parent(), Some(std::env::temp_dir().as_path()));
    assert!(path.ends_with("LiteMon_Driver.exe"));
}
