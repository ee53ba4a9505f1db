use herald::HeraldError;
use herald::config::{HeraldConfig, load_config};
use herald::logger::LogRotation;
use std::fs;
use tempfile::tempdir;

#[test]
fn loads_toml_file_over_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("herald.toml");
    fs::write(
        &path,
        r#"
[log]
name = "arena"
level = "debug"
rotation = "hourly"

[registry]
category_capacity = 4
"#,
    )?;

    let cfg: HeraldConfig = load_config(Some(&path))?;

    assert_eq!(cfg.log.name, "arena");
    assert_eq!(cfg.log.level, "debug");
    assert_eq!(cfg.log.rotation, LogRotation::Hourly);
    assert!(cfg.log.console, "unset keys keep their defaults");
    assert_eq!(cfg.registry.category_capacity, 4);
    assert_eq!(cfg.registry.listener_capacity, HeraldConfig::default().registry.listener_capacity);
    Ok(())
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempdir().expect("temp dir");
    let result = load_config::<HeraldConfig>(Some(dir.path().join("absent.toml")));
    assert!(matches!(result, Err(HeraldError::Config { .. })));
}

#[test]
fn unknown_keys_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("herald.toml");
    fs::write(&path, "[registry]\npriority = true\n")?;

    let err = load_config::<HeraldConfig>(Some(&path)).expect_err("unknown key should fail");
    assert!(err.to_string().contains("Failed to deserialize config"));
    Ok(())
}
