//! Integration tests for configuration loading

use colloquy_engine::agent::BoundPolicy;
use colloquy_engine::config::Config;
use colloquy_engine::errors::SessionError;

#[test]
fn test_load_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[core]
log_level = "debug"

[model]
default = "local-model"
endpoint = "http://localhost:8080"
api_key_env = ""

[loop]
default_max_loops = 4
bound_policy = "lenient"
"#,
    )
    .unwrap();

    let config = Config::load_from_path(&path).unwrap();
    assert_eq!(config.core.log_level, "debug");
    assert_eq!(config.model.default, "local-model");
    assert_eq!(config.model.endpoint, "http://localhost:8080");
    assert_eq!(config.loop_policy.default_max_loops, 4);
    assert_eq!(config.loop_policy.bound_policy, BoundPolicy::Lenient);
}

#[test]
fn test_load_missing_file() {
    let err = Config::load_from_path(std::path::Path::new("/no/such/config.toml")).unwrap_err();
    assert!(matches!(err, SessionError::Config(_)));
}

#[test]
fn test_load_invalid_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "not toml at all [[[").unwrap();

    let err = Config::load_from_path(&path).unwrap_err();
    assert!(matches!(err, SessionError::Config(_)));
}

#[test]
fn test_load_rejects_invalid_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[loop]\ndefault_max_loops = 0\n").unwrap();

    let err = Config::load_from_path(&path).unwrap_err();
    assert!(matches!(err, SessionError::Config(_)));
}
