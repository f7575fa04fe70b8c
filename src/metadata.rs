//! Project name lookup from package manifests.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GitPackageError, Result};

/// Supplies the name the archive and release directory are named after
pub trait ProjectMetadata {
    fn project_name(&self) -> Result<String>;
}

/// Reads the project name from the manifest in a directory.
///
/// Tries `Cargo.toml` (`[package].name`) first, then `composer.json`
/// (`name`, without its `vendor/` part).
pub struct ManifestMetadata {
    dir: PathBuf,
}

/// A fixed project name, e.g. supplied on the command line
pub struct StaticName(pub String);

#[derive(Deserialize)]
struct CargoManifest {
    package: Option<CargoPackage>,
}

#[derive(Deserialize)]
struct CargoPackage {
    name: String,
}

#[derive(Deserialize)]
struct ComposerManifest {
    name: Option<String>,
}

impl ManifestMetadata {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ManifestMetadata { dir: dir.into() }
    }

    fn from_cargo(&self, path: &Path) -> Result<Option<String>> {
        let text = fs::read_to_string(path)?;
        let manifest: CargoManifest = toml::from_str(&text).map_err(|e| {
            GitPackageError::metadata(format!("Invalid {}: {}", path.display(), e))
        })?;
        Ok(manifest.package.map(|p| p.name))
    }

    fn from_composer(&self, path: &Path) -> Result<Option<String>> {
        let text = fs::read_to_string(path)?;
        let manifest: ComposerManifest = serde_json::from_str(&text).map_err(|e| {
            GitPackageError::metadata(format!("Invalid {}: {}", path.display(), e))
        })?;
        Ok(manifest.name.map(|name| match name.split_once('/') {
            Some((_vendor, project)) => project.to_string(),
            None => name,
        }))
    }
}

impl ProjectMetadata for ManifestMetadata {
    fn project_name(&self) -> Result<String> {
        let cargo = self.dir.join("Cargo.toml");
        if cargo.is_file() {
            if let Some(name) = self.from_cargo(&cargo)? {
                return validate_project_name(&name);
            }
            log::debug!("{} has no [package] name", cargo.display());
        }

        let composer = self.dir.join("composer.json");
        if composer.is_file() {
            if let Some(name) = self.from_composer(&composer)? {
                return validate_project_name(&name);
            }
        }

        Err(GitPackageError::metadata(format!(
            "No project name found in {} (looked for Cargo.toml and composer.json)",
            self.dir.display()
        )))
    }
}

impl ProjectMetadata for StaticName {
    fn project_name(&self) -> Result<String> {
        validate_project_name(&self.0)
    }
}

/// Check a name can be used as a directory and archive prefix
pub fn validate_project_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() || name == "." || name == ".." {
        return Err(GitPackageError::metadata(format!(
            "Invalid project name '{}'",
            name
        )));
    }
    if name.contains(['/', '\\']) || name.chars().any(char::is_whitespace) {
        return Err(GitPackageError::metadata(format!(
            "Project name '{}' cannot contain path separators or whitespace",
            name
        )));
    }
    Ok(name.to_string())
}
