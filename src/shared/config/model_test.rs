use std::io::Write;
use std::time::Duration;

use crate::endpoint::RegistryError;
use crate::fanout::ExecutionMode;
use crate::shared::config::{DEFAULT_PORT, load_settings_from};

fn write_toml(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn test_full_config_is_loaded() {
    let file = write_toml(
        r#"
[client]
mode = "parallel"
timeout_ms = 750

[[endpoints]]
host = "10.1.0.5"
port = 6558
name = "site-a"

[[endpoints]]
host = "10.1.0.6"

[logging]
log_dir = "/var/log/lsq"
stdout_level = "warn"
"#,
    );

    let settings = load_settings_from(file.path()).expect("valid config");
    assert_eq!(settings.client.mode, ExecutionMode::Parallel);
    assert_eq!(settings.timeout(), Duration::from_millis(750));
    assert_eq!(settings.logging.log_dir.as_deref(), Some("/var/log/lsq"));
    assert_eq!(settings.logging.stdout_level, "warn");
    assert_eq!(settings.logging.file_level, "debug");

    let registry = settings.registry().expect("unique endpoints");
    let names: Vec<&str> = registry.endpoints().iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["site-a", "10.1.0.6"]);
    assert_eq!(registry.endpoints()[1].port(), DEFAULT_PORT);
}

#[test]
fn test_missing_sections_use_defaults() {
    let file = write_toml("");
    let settings = load_settings_from(file.path()).expect("empty config is valid");

    assert_eq!(settings.client.mode, ExecutionMode::Sequential);
    assert_eq!(settings.timeout(), Duration::from_secs(3));
    assert!(settings.endpoints.is_empty());
    assert!(settings.logging.log_dir.is_none());
    assert!(settings.registry().expect("empty registry").is_empty());
}

#[test]
fn test_duplicate_endpoint_names_are_rejected() {
    let file = write_toml(
        r#"
[[endpoints]]
host = "10.1.0.5"
name = "site"

[[endpoints]]
host = "10.1.0.6"
name = "site"
"#,
    );

    let settings = load_settings_from(file.path()).unwrap();
    assert!(matches!(
        settings.registry(),
        Err(RegistryError::DuplicateEndpoint(_))
    ));
}

#[test]
fn test_unknown_mode_is_an_error() {
    let file = write_toml("[client]\nmode = \"sideways\"\n");
    assert!(load_settings_from(file.path()).is_err());
}
