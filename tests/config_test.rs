//! Integration tests for Settings config loading with layered merge semantics.
//!
//! Layers (lowest to highest): defaults, global XDG file, explicit file,
//! TREEGRID_* env vars. Every test points XDG_CONFIG_HOME at a temp dir and
//! holds a process-wide lock, since env vars are shared across test threads.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

use tempfile::TempDir;

use treegrid::application::ApplicationError;
use treegrid::config::{OutputFormat, Settings};

const ENV_KEYS: [&str; 3] = ["TREEGRID_LABEL_KEY", "TREEGRID_FORMAT", "TREEGRID_COLOR"];

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Isolated config environment; restores env vars on drop.
struct ConfigEnv {
    xdg: TempDir,
    prev_xdg: Option<OsString>,
    _lock: MutexGuard<'static, ()>,
}

impl ConfigEnv {
    fn new() -> Self {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let xdg = TempDir::new().unwrap();
        let prev_xdg = env::var_os("XDG_CONFIG_HOME");
        env::set_var("XDG_CONFIG_HOME", xdg.path());
        for key in ENV_KEYS {
            env::remove_var(key);
        }
        Self {
            xdg,
            prev_xdg,
            _lock: lock,
        }
    }

    /// Write `$XDG_CONFIG_HOME/treegrid/treegrid.toml`.
    fn write_global(&self, content: &str) {
        let dir = self.xdg.path().join("treegrid");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("treegrid.toml"), content).unwrap();
    }

    /// Write an explicit config file outside the XDG tree.
    fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.xdg.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }
}

impl Drop for ConfigEnv {
    fn drop(&mut self) {
        for key in ENV_KEYS {
            env::remove_var(key);
        }
        match &self.prev_xdg {
            Some(value) => env::set_var("XDG_CONFIG_HOME", value),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }
    }
}

// ============================================================
// defaults and file layers
// ============================================================

#[test]
fn given_no_config_files_when_load_then_defaults() {
    let _env = ConfigEnv::new();

    let settings = Settings::load(None).expect("load settings");

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.label_key, "label");
    assert_eq!(settings.format, OutputFormat::Table);
    assert!(settings.color);
}

#[test]
fn given_global_config_when_load_then_global_values_applied() {
    // Arrange
    let env = ConfigEnv::new();
    env.write_global("label_key = \"name\"\ncolor = false\n");

    // Act
    let settings = Settings::load(None).expect("load settings");

    // Assert
    assert_eq!(settings.label_key, "name");
    assert!(!settings.color);
    assert_eq!(settings.format, OutputFormat::Table);
}

#[test]
fn given_global_and_explicit_config_when_load_then_explicit_wins_per_field() {
    // Arrange
    let env = ConfigEnv::new();
    env.write_global("label_key = \"name\"\nformat = \"json\"\n");
    let path = env.write_file("custom.toml", "label_key = \"title\"\n");

    // Act
    let settings = Settings::load(Some(path.as_path())).expect("load settings");

    // Assert
    assert_eq!(settings.label_key, "title");
    assert_eq!(settings.format, OutputFormat::Json);
}

#[test]
fn given_partial_config_file_when_load_then_unspecified_fields_inherited() {
    // Arrange
    let env = ConfigEnv::new();
    let path = env.write_file("treegrid.toml", "format = \"json\"\n");

    // Act
    let settings = Settings::load(Some(path.as_path())).expect("load settings");

    // Assert
    assert_eq!(settings.format, OutputFormat::Json);
    assert_eq!(settings.label_key, Settings::default().label_key);
}

#[test]
fn given_full_config_file_when_load_then_all_fields_replaced() {
    let env = ConfigEnv::new();
    let path = env.write_file(
        "custom.toml",
        r#"
label_key = "title"
format = "table"
color = false
"#,
    );

    let settings = Settings::load(Some(path.as_path())).expect("load settings");

    assert_eq!(settings.label_key, "title");
    assert_eq!(settings.format, OutputFormat::Table);
    assert!(!settings.color);
}

#[test]
fn given_missing_explicit_config_when_load_then_config_error() {
    let env = ConfigEnv::new();

    let result = Settings::load(Some(env.xdg.path().join("absent.toml").as_path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_invalid_format_value_when_load_then_config_error() {
    let env = ConfigEnv::new();
    let path = env.write_file("bad.toml", "format = \"yaml\"\n");

    let result = Settings::load(Some(path.as_path()));

    match result {
        Err(ApplicationError::Config { message }) => assert!(message.contains("bad.toml")),
        other => panic!("expected config error, got {:?}", other),
    }
}

// ============================================================
// env var layer
// ============================================================

#[test]
fn given_env_vars_when_load_then_override_explicit_config() {
    // Arrange
    let env = ConfigEnv::new();
    let path = env.write_file(
        "custom.toml",
        "label_key = \"title\"\nformat = \"table\"\ncolor = true\n",
    );
    env::set_var("TREEGRID_LABEL_KEY", "caption");
    env::set_var("TREEGRID_FORMAT", "json");
    env::set_var("TREEGRID_COLOR", "false");

    // Act
    let settings = Settings::load(Some(path.as_path())).expect("load settings");

    // Assert
    assert_eq!(settings.label_key, "caption");
    assert_eq!(settings.format, OutputFormat::Json);
    assert!(!settings.color);
}

#[test]
fn given_env_var_only_for_format_when_load_then_other_fields_from_files() {
    let env = ConfigEnv::new();
    env.write_global("label_key = \"name\"\n");
    env::set_var("TREEGRID_FORMAT", "JSON");

    let settings = Settings::load(None).expect("load settings");

    assert_eq!(settings.format, OutputFormat::Json);
    assert_eq!(settings.label_key, "name");
}

#[test]
fn given_invalid_format_env_var_when_load_then_config_error() {
    let _env = ConfigEnv::new();
    env::set_var("TREEGRID_FORMAT", "yaml");

    let result = Settings::load(None);

    match result {
        Err(ApplicationError::Config { message }) => assert!(message.contains("yaml")),
        other => panic!("expected config error, got {:?}", other),
    }
}

// ============================================================
// rendering
// ============================================================

#[test]
fn given_settings_when_rendering_toml_then_reparses_to_same_settings() {
    let settings = Settings {
        label_key: "name".to_string(),
        format: OutputFormat::Json,
        color: false,
    };

    let rendered = settings.to_toml().unwrap();

    assert!(rendered.contains("label_key = \"name\""));
    assert!(rendered.contains("format = \"json\""));
    let parsed: Settings = toml::from_str(&rendered).unwrap();
    assert_eq!(parsed, settings);
}
