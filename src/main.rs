use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};

use git_package::cli::{ReleaseOrchestrator, ReleaseRequest};
use git_package::clock::SystemClock;
use git_package::config::{self, PackageConfig};
use git_package::git::Git2Repository;
use git_package::metadata::{ManifestMetadata, ProjectMetadata, StaticName};
use git_package::ui;

#[derive(clap::Parser)]
#[command(
    name = "git-package",
    version,
    about = "Package the committed state of a git repository into a release archive"
)]
struct Args {
    #[arg(short, long, help = "Release version, overrides the tag or branch found in git")]
    tag: Option<String>,

    #[arg(short, long, help = "Keep the release directory after the archive is created")]
    keep: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(
        short = 'C',
        long,
        help = "Directory to package (defaults to the current directory)"
    )]
    directory: Option<PathBuf>,

    #[arg(long, help = "Project name, overrides the name read from the package manifest")]
    name: Option<String>,

    #[arg(long, help = "Preview the release without changing anything")]
    dry_run: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let working_dir = match args.directory.clone() {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    // Load configuration
    let config = match config::load_config(args.config.as_deref(), &working_dir) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    match args.name.clone() {
        Some(name) => release(&args, &working_dir, StaticName(name), config.package),
        None => release(
            &args,
            &working_dir,
            ManifestMetadata::new(&working_dir),
            config.package,
        ),
    }
}

fn release<M: ProjectMetadata>(
    args: &Args,
    working_dir: &Path,
    metadata: M,
    config: PackageConfig,
) -> Result<()> {
    let reader = match Git2Repository::open(working_dir) {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let request = ReleaseRequest {
        working_dir: working_dir.to_path_buf(),
        version_override: args.tag.clone(),
        keep: args.keep,
    };

    let plan = match ReleaseOrchestrator::new(reader, SystemClock, metadata, config).plan(request)
    {
        Ok(plan) => plan,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    if args.dry_run {
        ui::display_plan(&plan);
        return Ok(());
    }

    ui::display_status(&format!(
        "Packaging {} {}",
        plan.context.name, plan.context.version
    ));

    match plan.execute_with_progress(ui::display_step) {
        Ok(outcome) => {
            ui::display_success(&format!("Created {}", outcome.archive.display()));
            if let Some(dir) = outcome.release_dir {
                ui::display_status(&format!("Release directory kept at {}", dir.display()));
            }
            Ok(())
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }
}
