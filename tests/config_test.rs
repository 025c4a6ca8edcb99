use std::fs;

use pooper_scooper::config::{Config, ConfigError};
use tempfile::TempDir;

#[test]
fn test_load_missing_credentials_file() {
    let dir = TempDir::new().unwrap();
    let err = Config::load(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn test_load_malformed_credentials_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("credentials.json");
    fs::write(&path, "{ not json").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseJson { .. }));
}

#[test]
fn test_load_credentials_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("credentials.json");
    fs::write(
        &path,
        r#"{"token": "from-file", "prefix": "?", "data_dir": "scoops"}"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert!(!config.token.is_empty());
    assert_eq!(config.prefix, "?");
    assert!(config.data_file("polls.json").ends_with("scoops/polls.json"));
}
