//! Release tasks configured by the user.
//!
//! Tasks run after the snapshot is unpacked and before the release directory
//! is compressed. Paths are relative to the working directory, so a task that
//! targets the release directory names it explicitly (`widget/css`) or through
//! `${package.release_dir}`. Write `$${...}` for a literal `${...}`.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use walkdir::WalkDir;

use crate::domain::ReleaseContext;
use crate::error::{GitPackageError, Result};

// `$${...}` is the escape for a literal `${...}`
const PLACEHOLDER_PATTERN: &str = r"\$(\$?)\{([^}]*)\}";
const PLACEHOLDER_NAMESPACE: &str = "package.";

/// One configured task, e.g. `{ task = "copy", from = "css", to = "widget/css" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "lowercase")]
pub enum TaskDescriptor {
    /// Copy a file or a directory tree
    Copy { from: String, to: String },
    /// Create a directory and its parents
    Mkdir { dir: String },
    /// Remove a file or directory; a missing path is not an error
    Remove { path: String },
    /// Move a file or directory
    Rename { from: String, to: String },
    /// Replace a file's content
    Write { file: String, content: String },
    /// Append to a file, creating it if needed
    Append { file: String, content: String },
    /// Create the link `to` pointing at `from`
    Symlink { from: String, to: String },
    /// Run a process in the working directory
    Exec {
        command: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl TaskDescriptor {
    /// Task kind as written in the configuration
    pub fn kind(&self) -> &'static str {
        match self {
            TaskDescriptor::Copy { .. } => "copy",
            TaskDescriptor::Mkdir { .. } => "mkdir",
            TaskDescriptor::Remove { .. } => "remove",
            TaskDescriptor::Rename { .. } => "rename",
            TaskDescriptor::Write { .. } => "write",
            TaskDescriptor::Append { .. } => "append",
            TaskDescriptor::Symlink { .. } => "symlink",
            TaskDescriptor::Exec { .. } => "exec",
        }
    }

    /// Reject descriptors with empty required parameters
    pub fn validate_shape(&self) -> Result<()> {
        let required: Vec<(&str, &str)> = match self {
            TaskDescriptor::Copy { from, to }
            | TaskDescriptor::Rename { from, to }
            | TaskDescriptor::Symlink { from, to } => {
                vec![("from", from.as_str()), ("to", to.as_str())]
            }
            TaskDescriptor::Mkdir { dir } => vec![("dir", dir.as_str())],
            TaskDescriptor::Remove { path } => vec![("path", path.as_str())],
            TaskDescriptor::Write { file, .. } | TaskDescriptor::Append { file, .. } => {
                vec![("file", file.as_str())]
            }
            TaskDescriptor::Exec { command, .. } => vec![("command", command.as_str())],
        };

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(GitPackageError::config(format!(
                    "'{}' task requires a non-empty '{}'",
                    self.kind(),
                    field
                )));
            }
        }
        Ok(())
    }

    /// Substitute `${package.*}` placeholders in every string parameter
    pub fn expand(&self, ctx: &ReleaseContext) -> Result<TaskDescriptor> {
        let pattern = Regex::new(PLACEHOLDER_PATTERN)
            .map_err(|e| GitPackageError::config(format!("Invalid placeholder pattern: {}", e)))?;
        let sub = |value: &String| expand_placeholders(&pattern, value, ctx);

        let expanded = match self {
            TaskDescriptor::Copy { from, to } => TaskDescriptor::Copy {
                from: sub(from)?,
                to: sub(to)?,
            },
            TaskDescriptor::Mkdir { dir } => TaskDescriptor::Mkdir { dir: sub(dir)? },
            TaskDescriptor::Remove { path } => TaskDescriptor::Remove { path: sub(path)? },
            TaskDescriptor::Rename { from, to } => TaskDescriptor::Rename {
                from: sub(from)?,
                to: sub(to)?,
            },
            TaskDescriptor::Write { file, content } => TaskDescriptor::Write {
                file: sub(file)?,
                content: sub(content)?,
            },
            TaskDescriptor::Append { file, content } => TaskDescriptor::Append {
                file: sub(file)?,
                content: sub(content)?,
            },
            TaskDescriptor::Symlink { from, to } => TaskDescriptor::Symlink {
                from: sub(from)?,
                to: sub(to)?,
            },
            TaskDescriptor::Exec { command, args } => TaskDescriptor::Exec {
                command: sub(command)?,
                args: args.iter().map(sub).collect::<Result<Vec<_>>>()?,
            },
        };
        Ok(expanded)
    }

    /// Execute an already expanded descriptor
    pub fn apply(&self, ctx: &ReleaseContext) -> Result<()> {
        log::debug!("Running task {}", self);

        match self {
            TaskDescriptor::Copy { from, to } => copy(&ctx.resolve(from), &ctx.resolve(to)),
            TaskDescriptor::Mkdir { dir } => Ok(fs::create_dir_all(ctx.resolve(dir))?),
            TaskDescriptor::Remove { path } => remove(&ctx.resolve(path)),
            TaskDescriptor::Rename { from, to } => {
                let to = ctx.resolve(to);
                create_parent(&to)?;
                Ok(fs::rename(ctx.resolve(from), to)?)
            }
            TaskDescriptor::Write { file, content } => {
                let file = ctx.resolve(file);
                create_parent(&file)?;
                Ok(fs::write(file, content)?)
            }
            TaskDescriptor::Append { file, content } => {
                let file = ctx.resolve(file);
                create_parent(&file)?;
                let mut handle = fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(file)?;
                Ok(handle.write_all(content.as_bytes())?)
            }
            TaskDescriptor::Symlink { from, to } => {
                let to = ctx.resolve(to);
                create_parent(&to)?;
                symlink(Path::new(from), &to)
            }
            TaskDescriptor::Exec { command, args } => exec(command, args, ctx),
        }
        .map_err(|e| match e {
            GitPackageError::Task(_) => e,
            other => GitPackageError::task(format!("{}: {}", self, other)),
        })
    }
}

impl fmt::Display for TaskDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskDescriptor::Copy { from, to } => write!(f, "copy {} -> {}", from, to),
            TaskDescriptor::Mkdir { dir } => write!(f, "mkdir {}", dir),
            TaskDescriptor::Remove { path } => write!(f, "remove {}", path),
            TaskDescriptor::Rename { from, to } => write!(f, "rename {} -> {}", from, to),
            TaskDescriptor::Write { file, .. } => write!(f, "write {}", file),
            TaskDescriptor::Append { file, .. } => write!(f, "append {}", file),
            TaskDescriptor::Symlink { from, to } => write!(f, "symlink {} -> {}", to, from),
            TaskDescriptor::Exec { command, args } => {
                write!(f, "exec {}", command)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                Ok(())
            }
        }
    }
}

/// Expand and check every descriptor before anything touches the filesystem
pub fn prepare_tasks(tasks: &[TaskDescriptor], ctx: &ReleaseContext) -> Result<Vec<TaskDescriptor>> {
    tasks
        .iter()
        .enumerate()
        .map(|(index, task)| {
            task.validate_shape()
                .and_then(|_| task.expand(ctx))
                .map_err(|e| task_error_at(index, e))
        })
        .collect()
}

/// Prefix an error with the position of the task that caused it
pub(crate) fn task_error_at(index: usize, err: GitPackageError) -> GitPackageError {
    match err {
        GitPackageError::Config(msg) => GitPackageError::config(format!("tasks[{}]: {}", index, msg)),
        other => GitPackageError::config(format!("tasks[{}]: {}", index, other)),
    }
}

/// Environment exported to `exec` tasks
pub fn task_env_vars(ctx: &ReleaseContext) -> HashMap<String, String> {
    let mut env = HashMap::new();

    env.insert("GITPACKAGE_NAME".to_string(), ctx.name.clone());
    env.insert("GITPACKAGE_VERSION".to_string(), ctx.version.clone());
    env.insert("GITPACKAGE_ARCHIVE".to_string(), ctx.archive_name());
    env.insert(
        "GITPACKAGE_RELEASE_DIR".to_string(),
        ctx.release_dir().display().to_string(),
    );
    env.insert(
        "GITPACKAGE_TIMESTAMP".to_string(),
        ctx.stamp.timestamp.to_string(),
    );

    env
}

fn expand_placeholders(pattern: &Regex, value: &str, ctx: &ReleaseContext) -> Result<String> {
    let mut unknown = None;

    let expanded = pattern.replace_all(value, |caps: &Captures| {
        let key = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{}}}", key);
        }
        let resolved = key
            .strip_prefix(PLACEHOLDER_NAMESPACE)
            .and_then(|name| ctx.placeholder(name));

        match resolved {
            Some(value) => value,
            None => {
                unknown.get_or_insert_with(|| key.to_string());
                String::new()
            }
        }
    });

    match unknown {
        Some(key) => Err(GitPackageError::config(format!(
            "Unknown placeholder '${{{}}}'",
            key
        ))),
        None => Ok(expanded.into_owned()),
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn copy(from: &Path, to: &Path) -> Result<()> {
    if fs::symlink_metadata(from)?.file_type().is_symlink() {
        create_parent(to)?;
        return copy_link(from, to);
    }

    for entry in WalkDir::new(from) {
        let entry = entry.map_err(|e| GitPackageError::task(format!("Cannot walk {}: {}", from.display(), e)))?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| GitPackageError::task(e.to_string()))?;
        let target = if relative.as_os_str().is_empty() {
            to.to_path_buf()
        } else {
            to.join(relative)
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else if file_type.is_symlink() {
            create_parent(&target)?;
            copy_link(entry.path(), &target)?;
        } else {
            create_parent(&target)?;
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Recreate `link` at `to` with the same target, without following it
fn copy_link(link: &Path, to: &Path) -> Result<()> {
    let target = fs::read_link(link)?;
    symlink(&target, to)
}

/// Remove a file, link or directory; nothing to do if it does not exist
pub(crate) fn remove(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(fs::remove_dir_all(path)?),
        Ok(_) => Ok(fs::remove_file(path)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> Result<()> {
    Ok(std::os::unix::fs::symlink(target, link)?)
}

#[cfg(not(unix))]
fn symlink(_target: &Path, _link: &Path) -> Result<()> {
    Err(GitPackageError::task(
        "symlink tasks are only supported on unix",
    ))
}

fn exec(command: &str, args: &[String], ctx: &ReleaseContext) -> Result<()> {
    let output = Command::new(command)
        .args(args)
        .current_dir(&ctx.working_dir)
        .envs(task_env_vars(ctx))
        .output()
        .map_err(|e| GitPackageError::task(format!("Failed to execute {}: {}", command, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        return Err(GitPackageError::task(format!(
            "{} failed with exit code {}\nStdout: {}\nStderr: {}",
            command,
            output.status.code().unwrap_or(-1),
            stdout,
            stderr
        )));
    }

    Ok(())
}
