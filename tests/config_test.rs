// tests/config_test.rs
use git_package::config::{load_config, Config, CONFIG_FILE_NAME};
use git_package::tasks::TaskDescriptor;
use serial_test::serial;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const TASKS_TOML: &str = r#"
[package]
date_format = "%Y%m%d"

[[package.tasks]]
task = "copy"
from = "fonts"
to = "${package.release_dir}/fonts"

[[package.tasks]]
task = "exec"
command = "npm"
args = ["run", "build"]
"#;

#[test]
fn test_load_from_explicit_path() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(TASKS_TOML.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    let working_dir = TempDir::new().unwrap();

    let config = load_config(Some(temp_file.path()), working_dir.path()).unwrap();

    assert_eq!(config.package.date_format, "%Y%m%d");
    assert_eq!(config.package.time_format, "%H:%M:%S");
    assert_eq!(
        config.package.tasks,
        vec![
            TaskDescriptor::Copy {
                from: "fonts".to_string(),
                to: "${package.release_dir}/fonts".to_string(),
            },
            TaskDescriptor::Exec {
                command: "npm".to_string(),
                args: vec!["run".to_string(), "build".to_string()],
            },
        ]
    );
}

#[test]
fn test_load_from_working_dir() {
    let working_dir = TempDir::new().unwrap();
    fs::write(working_dir.path().join(CONFIG_FILE_NAME), TASKS_TOML).unwrap();

    let config = load_config(None, working_dir.path()).unwrap();
    assert_eq!(config.package.tasks.len(), 2);
}

#[test]
fn test_missing_explicit_path_is_error() {
    let working_dir = TempDir::new().unwrap();
    let missing = working_dir.path().join("nope.toml");

    let err = load_config(Some(&missing), working_dir.path()).unwrap_err();
    assert!(err.to_string().contains("nope.toml"));
}

#[test]
fn test_bad_date_format_is_rejected() {
    let working_dir = TempDir::new().unwrap();
    fs::write(
        working_dir.path().join(CONFIG_FILE_NAME),
        "[package]\ndate_format = \"%Q\"\n",
    )
    .unwrap();

    assert!(load_config(None, working_dir.path()).is_err());
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_global_config_fallback() {
    let config_home = TempDir::new().unwrap();
    fs::write(
        config_home.path().join(format!(".{}", CONFIG_FILE_NAME)),
        "[package]\ntime_format = \"%H%M\"\n",
    )
    .unwrap();
    let working_dir = TempDir::new().unwrap();

    std::env::set_var("XDG_CONFIG_HOME", config_home.path());
    let result = load_config(None, working_dir.path());
    std::env::remove_var("XDG_CONFIG_HOME");

    assert_eq!(result.unwrap().package.time_format, "%H%M");
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_local_config_wins_over_global() {
    let config_home = TempDir::new().unwrap();
    fs::write(
        config_home.path().join(format!(".{}", CONFIG_FILE_NAME)),
        "[package]\ntime_format = \"%H%M\"\n",
    )
    .unwrap();
    let working_dir = TempDir::new().unwrap();
    fs::write(
        working_dir.path().join(CONFIG_FILE_NAME),
        "[package]\ntime_format = \"%H.%M\"\n",
    )
    .unwrap();

    std::env::set_var("XDG_CONFIG_HOME", config_home.path());
    let result = load_config(None, working_dir.path());
    std::env::remove_var("XDG_CONFIG_HOME");

    assert_eq!(result.unwrap().package.time_format, "%H.%M");
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_defaults_when_nothing_found() {
    let config_home = TempDir::new().unwrap();
    let working_dir = TempDir::new().unwrap();

    std::env::set_var("XDG_CONFIG_HOME", config_home.path());
    let result = load_config(None, working_dir.path());
    std::env::remove_var("XDG_CONFIG_HOME");

    assert_eq!(result.unwrap(), Config::default());
}
