use std::fs;

use super::PackagingStep;
use crate::archive;
use crate::domain::ReleaseContext;
use crate::error::Result;
use crate::git::Git2Repository;
use crate::tasks::{self, TaskDescriptor};

/// Remove the archive, release directory and intermediates of a previous run
pub struct Purge;

impl PackagingStep for Purge {
    fn name(&self) -> &'static str {
        "purge"
    }

    fn run(&self, ctx: &ReleaseContext) -> Result<()> {
        for path in [
            ctx.archive_path(),
            ctx.partial_archive_path(),
            ctx.release_dir(),
            ctx.snapshot_path(),
        ] {
            log::debug!("Removing {}", path.display());
            tasks::remove(&path)?;
        }
        Ok(())
    }
}

/// Export the committed tree of HEAD to the intermediate snapshot tar
pub struct Snapshot;

impl PackagingStep for Snapshot {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn run(&self, ctx: &ReleaseContext) -> Result<()> {
        let repo = Git2Repository::open(&ctx.working_dir)?;
        repo.export_head(&ctx.snapshot_path())
    }
}

/// Expand the snapshot into the release directory and drop the snapshot
pub struct Unpack;

impl PackagingStep for Unpack {
    fn name(&self) -> &'static str {
        "unpack"
    }

    fn run(&self, ctx: &ReleaseContext) -> Result<()> {
        let snapshot = ctx.snapshot_path();
        archive::unpack_tar(&snapshot, &ctx.release_dir())?;
        fs::remove_file(&snapshot)?;
        Ok(())
    }
}

/// Run the configured release tasks in order
pub struct CustomTasks {
    tasks: Vec<TaskDescriptor>,
}

impl CustomTasks {
    pub fn new(tasks: Vec<TaskDescriptor>) -> Self {
        CustomTasks { tasks }
    }
}

impl PackagingStep for CustomTasks {
    fn name(&self) -> &'static str {
        "custom-tasks"
    }

    fn run(&self, ctx: &ReleaseContext) -> Result<()> {
        if self.tasks.is_empty() {
            log::debug!("No release tasks configured");
        }
        for task in &self.tasks {
            log::info!("  {}", task);
            task.apply(ctx)?;
        }
        Ok(())
    }
}

/// Build the final archive from the release directory.
///
/// Writes to a partial file and renames it, so the final name only ever holds
/// a complete archive.
pub struct Compress;

impl PackagingStep for Compress {
    fn name(&self) -> &'static str {
        "compress"
    }

    fn run(&self, ctx: &ReleaseContext) -> Result<()> {
        let partial = ctx.partial_archive_path();
        archive::tar_gz_dir(&ctx.release_dir(), &ctx.name, &partial)?;
        fs::rename(&partial, ctx.archive_path())?;
        Ok(())
    }
}

/// Remove the release directory
pub struct Cleanup;

impl PackagingStep for Cleanup {
    fn name(&self) -> &'static str {
        "cleanup"
    }

    fn run(&self, ctx: &ReleaseContext) -> Result<()> {
        tasks::remove(&ctx.release_dir())
    }
}
