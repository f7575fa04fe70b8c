//! Release workflow orchestration
//!
//! Wires version resolution and the packaging pipeline together for one
//! invocation, independently of clap so it can be driven programmatically.

use std::path::PathBuf;

use crate::clock::{self, Clock};
use crate::config::PackageConfig;
use crate::domain::ReleaseContext;
use crate::error::{GitPackageError, Result};
use crate::git::RepositoryReader;
use crate::metadata::ProjectMetadata;
use crate::pipeline::Pipeline;
use crate::tasks::{self, TaskDescriptor};
use crate::version::resolve_version;

/// Arguments for one release
///
/// Mirrors the CLI flags without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseRequest {
    /// Directory holding the checkout; outputs are written here too
    pub working_dir: PathBuf,

    /// Use this version instead of resolving one from git
    pub version_override: Option<String>,

    /// Leave the release directory in place after compressing
    pub keep: bool,
}

impl ReleaseRequest {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        ReleaseRequest {
            working_dir: working_dir.into(),
            version_override: None,
            keep: false,
        }
    }
}

/// Result of a successful release
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    pub archive: PathBuf,

    pub version: String,

    /// Present when the release directory was kept
    pub release_dir: Option<PathBuf>,
}

/// Entry point for one release.
///
/// The repository reader and clock are injected here and consumed by
/// [plan](ReleaseOrchestrator::plan), so the reader is released as soon as the
/// version is known.
pub struct ReleaseOrchestrator<R, C, M> {
    reader: R,
    clock: C,
    metadata: M,
    config: PackageConfig,
}

/// A fully resolved release, ready to execute
pub struct ReleasePlan {
    pub context: ReleaseContext,
    pub tasks: Vec<TaskDescriptor>,
    pipeline: Pipeline,
}

impl<R, C, M> ReleaseOrchestrator<R, C, M>
where
    R: RepositoryReader,
    C: Clock,
    M: ProjectMetadata,
{
    pub fn new(reader: R, clock: C, metadata: M, config: PackageConfig) -> Self {
        ReleaseOrchestrator {
            reader,
            clock,
            metadata,
            config,
        }
    }

    /// Resolve name, version and timestamp, and build the pipeline.
    ///
    /// Nothing is written to disk. Task descriptors are expanded and checked
    /// here so configuration mistakes surface before the snapshot is taken.
    pub fn plan(self, request: ReleaseRequest) -> Result<ReleasePlan> {
        let name = self.metadata.project_name()?;

        let version = match request.version_override {
            Some(ref version) => {
                log::debug!("Using version override '{}'", version);
                validate_version_override(version)?
            }
            None => resolve_version(&self.reader)?.into_string(),
        };
        drop(self.reader);

        let stamp = clock::stamp(
            self.clock.now(),
            &self.config.date_format,
            &self.config.time_format,
        )?;

        let context = ReleaseContext::new(name, version, request.working_dir, request.keep, stamp);
        let tasks = tasks::prepare_tasks(&self.config.tasks, &context)?;
        let pipeline = Pipeline::standard(&context, tasks.clone());

        log::info!(
            "Packaging {} {} into {}",
            context.name,
            context.version,
            context.archive_name()
        );

        Ok(ReleasePlan {
            context,
            tasks,
            pipeline,
        })
    }

    /// Plan and execute in one go
    pub fn run(self, request: ReleaseRequest) -> Result<ReleaseOutcome> {
        self.plan(request)?.execute()
    }
}

impl ReleasePlan {
    pub fn step_names(&self) -> Vec<&'static str> {
        self.pipeline.step_names()
    }

    pub fn execute(self) -> Result<ReleaseOutcome> {
        self.execute_with_progress(|_, _, _| {})
    }

    pub fn execute_with_progress<F>(self, progress: F) -> Result<ReleaseOutcome>
    where
        F: FnMut(usize, usize, &'static str),
    {
        self.pipeline.run_with_progress(&self.context, progress)?;

        Ok(ReleaseOutcome {
            archive: self.context.archive_path(),
            version: self.context.version.clone(),
            release_dir: self.context.keep.then(|| self.context.release_dir()),
        })
    }
}

/// Check a user supplied version can be used in the archive name
pub fn validate_version_override(version: &str) -> Result<String> {
    let trimmed = version.trim();
    if trimmed.is_empty() {
        return Err(GitPackageError::config("Version override cannot be empty"));
    }
    if trimmed.contains(['/', '\\']) || trimmed.chars().any(char::is_whitespace) {
        return Err(GitPackageError::config(format!(
            "Version override '{}' cannot contain path separators or whitespace",
            version
        )));
    }
    Ok(trimmed.to_string())
}
