use std::io::Write;

use keeper_core::{ConfigOverrides, ExErrorKind, KeeperConfig, KeeperError};
use tempfile::NamedTempFile;

fn write_config(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_config(
        r#"
        servers = ["zk-a:2181", "zk-b:2181"]
        base_path = "/inventory/prod"
        session_timeout_ms = 3000
        "#,
    );

    let config = KeeperConfig::load(Some(file.path()), &ConfigOverrides::default()).unwrap();
    assert_eq!(config.store.connect_string(), "zk-a:2181,zk-b:2181");
    assert_eq!(config.store.base_path, "/inventory/prod");
    assert_eq!(config.store.session_timeout_ms, 3000);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = write_config("base_path = \"/other\"\n");

    let config = KeeperConfig::load(Some(file.path()), &ConfigOverrides::default()).unwrap();
    assert_eq!(config.store.base_path, "/other");
    assert_eq!(
        config.store.connect_string(),
        "zoo1.dmz:2181,zoo2.dmz:2181,zoo3.dmz:2181"
    );
}

#[test]
fn test_overrides_beat_file() {
    let file = write_config("servers = \"zk-a:2181\"\nbase_path = \"/from-file\"\n");
    let overrides = ConfigOverrides {
        servers: Some("zk-z:2181".to_string()),
        base_path: None,
    };

    let config = KeeperConfig::load(Some(file.path()), &overrides).unwrap();
    assert_eq!(config.store.connect_string(), "zk-z:2181");
    assert_eq!(config.store.base_path, "/from-file");
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    let err = KeeperConfig::load(Some(&missing), &ConfigOverrides::default()).unwrap_err();
    assert!(matches!(err, KeeperError::Config { .. }));
    assert_eq!(err.kind(), ExErrorKind::Config);
}

#[test]
fn test_empty_server_list_rejected() {
    let file = write_config("servers = []\n");
    let err = KeeperConfig::load(Some(file.path()), &ConfigOverrides::default()).unwrap_err();
    assert!(err.to_string().contains("at least one"));
}
