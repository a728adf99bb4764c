//! Configuration loading and precedence tests

use pretty_assertions::assert_eq;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tocc_config::{BindingsConfig, ConfigError, ConfigLoader, LoggingConfig};

fn create_config_file(dir: &Path, content: &str) -> PathBuf {
    let config_path = dir.join("tocc.toml");
    fs::write(&config_path, content).unwrap();
    config_path
}

/// Loader whose global layer lives inside `dir`
fn isolated_loader(dir: &Path) -> ConfigLoader {
    ConfigLoader::with_global_config_path(dir.join("global").join("config.toml"))
}

// ============================================================================
// Loading
// ============================================================================

#[test]
#[serial]
fn test_load_project_config_basic() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(
        temp_dir.path(),
        r#"
[logging]
filter = "tocc.manager=debug"
"#,
    );

    let config = isolated_loader(temp_dir.path())
        .load_from_directory(temp_dir.path())
        .unwrap();

    assert!(config.is_project());
    assert_eq!(config.bindings.log_filter(), "tocc.manager=debug");
}

#[test]
#[serial]
fn test_load_when_no_config_exists() {
    let temp_dir = TempDir::new().unwrap();

    let config = isolated_loader(temp_dir.path())
        .load_from_directory(temp_dir.path())
        .unwrap();

    assert!(!config.is_project());
    assert_eq!(config.bindings, BindingsConfig::default());
}

#[test]
#[serial]
fn test_load_from_subdirectory_finds_parent() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "[manager]\nrequire_absolute_base_path = false\n");

    let nested = temp_dir.path().join("a").join("b");
    fs::create_dir_all(&nested).unwrap();

    let config = isolated_loader(temp_dir.path())
        .load_from_directory(&nested)
        .unwrap();

    assert_eq!(config.project_root(), Some(temp_dir.path()));
    assert!(!config.bindings.require_absolute_base_path());
}

#[test]
#[serial]
fn test_load_with_empty_config() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "");

    let config = isolated_loader(temp_dir.path())
        .load_from_directory(temp_dir.path())
        .unwrap();

    assert!(config.is_project());
    assert_eq!(config.bindings.log_filter(), "warn");
}

#[test]
#[serial]
fn test_load_from_specific_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "[logging]\nwith_target = true\n");

    let config = isolated_loader(temp_dir.path())
        .load_from_file(&path)
        .unwrap();

    assert!(config.bindings.log_with_target());
}

#[test]
#[serial]
fn test_load_missing_specific_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tocc.toml");

    let err = isolated_loader(temp_dir.path())
        .load_from_file(&path)
        .unwrap_err();

    assert!(matches!(err, ConfigError::NotFound(p) if p == path));
}

// ============================================================================
// Invalid config
// ============================================================================

#[test]
#[serial]
fn test_invalid_toml_syntax() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "[logging\nfilter = \"broken\n");

    let result = isolated_loader(temp_dir.path()).load_from_directory(temp_dir.path());

    assert!(matches!(result, Err(ConfigError::TomlParseError { .. })));
}

#[test]
#[serial]
fn test_unknown_section_rejected() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "[engine]\nkind = \"sqlite\"\n");

    let result = isolated_loader(temp_dir.path()).load_from_directory(temp_dir.path());

    assert!(result.is_err());
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
#[serial]
fn test_project_overrides_global() {
    let temp_dir = TempDir::new().unwrap();
    let global_dir = temp_dir.path().join("global");
    fs::create_dir_all(&global_dir).unwrap();
    fs::write(
        global_dir.join("config.toml"),
        "[logging]\nfilter = \"info\"\nwith_target = true\n",
    )
    .unwrap();

    let project = temp_dir.path().join("project");
    fs::create_dir_all(&project).unwrap();
    create_config_file(&project, "[logging]\nfilter = \"debug\"\n");

    let config = isolated_loader(temp_dir.path())
        .load_from_directory(&project)
        .unwrap();

    assert_eq!(
        config.bindings.logging,
        Some(LoggingConfig {
            filter: Some("debug".to_string()),
            with_target: Some(true),
        })
    );
}

#[test]
#[serial]
fn test_env_overrides_project() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(
        temp_dir.path(),
        "[logging]\nfilter = \"info\"\n\n[manager]\nrequire_absolute_base_path = true\n",
    );

    env::set_var("TOCC_LOG", "tocc.engine=trace");
    env::set_var("TOCC_REQUIRE_ABSOLUTE_PATH", "no");

    let result = isolated_loader(temp_dir.path()).load_from_directory(temp_dir.path());

    env::remove_var("TOCC_LOG");
    env::remove_var("TOCC_REQUIRE_ABSOLUTE_PATH");

    let config = result.unwrap();
    assert_eq!(config.bindings.log_filter(), "tocc.engine=trace");
    assert!(!config.bindings.require_absolute_base_path());
}

#[test]
#[serial]
fn test_env_invalid_flag() {
    let temp_dir = TempDir::new().unwrap();

    env::set_var("TOCC_LOG_TARGET", "sometimes");
    let result = isolated_loader(temp_dir.path()).load_from_directory(temp_dir.path());
    env::remove_var("TOCC_LOG_TARGET");

    insta::assert_snapshot!(
        result.unwrap_err().to_string(),
        @"Invalid value for 'TOCC_LOG_TARGET': expected a boolean, found 'sometimes'"
    );
}

#[test]
#[serial]
fn test_env_empty_filter_rejected() {
    let temp_dir = TempDir::new().unwrap();

    env::set_var("TOCC_LOG", "");
    let result = isolated_loader(temp_dir.path()).load_from_directory(temp_dir.path());
    env::remove_var("TOCC_LOG");

    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}
