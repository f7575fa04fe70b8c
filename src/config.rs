use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::clock;
use crate::error::{GitPackageError, Result};
use crate::tasks::{self, TaskDescriptor};

/// Name of the project-level configuration file
pub const CONFIG_FILE_NAME: &str = "gitpackage.toml";

/// Represents the complete configuration for git-package.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub package: PackageConfig,
}

/// Returns the default strftime format for `${package.date}`.
fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

/// Returns the default strftime format for `${package.time}`.
fn default_time_format() -> String {
    "%H:%M:%S".to_string()
}

/// Configuration for the packaging run.
///
/// `tasks` are executed in order between unpacking the snapshot and
/// compressing the release directory.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PackageConfig {
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default = "default_time_format")]
    pub time_format: String,

    #[serde(default)]
    pub tasks: Vec<TaskDescriptor>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        PackageConfig {
            date_format: default_date_format(),
            time_format: default_time_format(),
            tasks: Vec::new(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text and validate it
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)
            .map_err(|e| GitPackageError::config(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the parts of the configuration that do not depend on a release
    pub fn validate(&self) -> Result<()> {
        clock::validate_format(&self.package.date_format)?;
        clock::validate_format(&self.package.time_format)?;
        for (index, task) in self.package.tasks.iter().enumerate() {
            task.validate_shape()
                .map_err(|e| tasks::task_error_at(index, e))?;
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitpackage.toml` in the working directory
/// 3. `.gitpackage.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `working_dir` - Directory being packaged
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&Path>, working_dir: &Path) -> Result<Config> {
    let local = working_dir.join(CONFIG_FILE_NAME);

    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if local.exists() {
        local
    } else if let Some(config_dir) = dirs::config_dir() {
        let global = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if global.exists() {
            global
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    log::debug!("Loading configuration from {}", path.display());
    let text = fs::read_to_string(&path).map_err(|e| {
        GitPackageError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;
    Config::from_toml(&text)
}
