use bihub_kernel::config::{ConfigError, load_config};
use bihub_kernel::domain::config::{CipherKind, PlatformConfig};
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

#[test]
#[serial]
fn loads_platform_config_from_toml() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("bihub.toml");
    fs::write(
        &path,
        r#"
[logging]
name = "importer"
level = "debug"

[encryption]
secret = "from-file"
cipher = "chacha"

[import]
merge_locales = false
"#,
    )?;

    let cfg: PlatformConfig = load_config(Some(&path))?;

    assert_eq!(cfg.logging.name, "importer");
    assert_eq!(cfg.logging.level, "debug");
    assert_eq!(cfg.encryption.secret, "from-file");
    assert_eq!(cfg.encryption.cipher, CipherKind::ChaCha);
    assert_eq!(cfg.encryption.salt, "bihub", "unset keys keep their defaults");
    assert!(!cfg.import.merge_locales);
    Ok(())
}

#[test]
#[serial]
fn missing_file_is_reported_with_context() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("absent.toml");

    let err = load_config::<PlatformConfig>(Some(&path)).expect_err("file is required");

    let ConfigError::Config { context, .. } = &err;
    assert_eq!(context.as_deref(), Some("Failed to build config"));
    assert!(err.to_string().starts_with("Config error (Failed to build config)"));
}
