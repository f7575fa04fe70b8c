//! Packaging pipeline
//!
//! A release is produced by running a fixed sequence of [PackagingStep]s
//! against one [ReleaseContext]:
//!
//! 1. `purge` - remove leftovers of previous runs
//! 2. `snapshot` - export the committed tree of HEAD to an intermediate tar
//! 3. `unpack` - expand the snapshot into the release directory
//! 4. `custom-tasks` - run the configured task descriptors
//! 5. `compress` - write `{name}-{version}.tar.gz`
//! 6. `cleanup` - remove the release directory (omitted with `keep`)
//!
//! Steps run strictly in order and the first failure stops the run. Nothing
//! is rolled back: partial state stays on disk for inspection and the next
//! run's `purge` clears it.

pub mod steps;

pub use steps::{Cleanup, Compress, CustomTasks, Purge, Snapshot, Unpack};

use crate::domain::ReleaseContext;
use crate::error::{GitPackageError, Result};
use crate::tasks::TaskDescriptor;

/// One unit of packaging work
pub trait PackagingStep {
    /// Stable name used in logs and error messages
    fn name(&self) -> &'static str;

    fn run(&self, ctx: &ReleaseContext) -> Result<()>;
}

/// Ordered list of steps executed fail-fast
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Box<dyn PackagingStep>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Pipeline { steps: Vec::new() }
    }

    /// The built-in six step sequence with `tasks` spliced in after unpacking.
    ///
    /// `tasks` must already be expanded (see [crate::tasks::prepare_tasks]).
    /// The cleanup step is left out entirely when the context asks to keep the
    /// release directory.
    pub fn standard(ctx: &ReleaseContext, tasks: Vec<TaskDescriptor>) -> Self {
        let pipeline = Pipeline::new()
            .with_step(Purge)
            .with_step(Snapshot)
            .with_step(Unpack)
            .with_step(CustomTasks::new(tasks))
            .with_step(Compress);

        if ctx.keep {
            pipeline
        } else {
            pipeline.with_step(Cleanup)
        }
    }

    /// Append a step
    pub fn with_step(mut self, step: impl PackagingStep + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn run(&self, ctx: &ReleaseContext) -> Result<()> {
        self.run_with_progress(ctx, |_, _, _| {})
    }

    /// Run every step, calling `progress(index, total, name)` before each.
    ///
    /// # Returns
    /// * `Ok(())` - All steps succeeded
    /// * `Err(GitPackageError::Step)` - The first failure, tagged with the step name
    pub fn run_with_progress<F>(&self, ctx: &ReleaseContext, mut progress: F) -> Result<()>
    where
        F: FnMut(usize, usize, &'static str),
    {
        let total = self.steps.len();

        for (index, step) in self.steps.iter().enumerate() {
            let name = step.name();
            progress(index + 1, total, name);
            log::info!("[{}/{}] {}", index + 1, total, name);

            if let Err(e) = step.run(ctx) {
                log::error!("Step '{}' failed: {}", name, e);
                return Err(GitPackageError::step(name, e));
            }
        }

        Ok(())
    }
}
