//! Terminal output for the command line.

use console::style;

use crate::cli::ReleasePlan;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Print progress before a pipeline step runs
pub fn display_step(index: usize, total: usize, name: &str) {
    println!(
        "{} {}",
        style(format!("[{}/{}]", index, total)).dim(),
        name
    );
}

/// Print what a release would do without running it
pub fn display_plan(plan: &ReleasePlan) {
    println!("\n{}", style("Release plan:").bold());
    for line in plan_lines(plan) {
        println!("  {}", line);
    }
}

/// Plain text lines describing a plan
pub fn plan_lines(plan: &ReleasePlan) -> Vec<String> {
    let ctx = &plan.context;
    let mut lines = vec![
        format!("Project: {}", ctx.name),
        format!("Version: {}", ctx.version),
        format!("Archive: {}", ctx.archive_path().display()),
        format!("Release directory: {}", ctx.release_dir().display()),
        "Steps:".to_string(),
    ];

    for (i, step) in plan.step_names().iter().enumerate() {
        lines.push(format!("  {}. {}", i + 1, step));
        if *step == "custom-tasks" {
            for task in &plan.tasks {
                lines.push(format!("     - {}", task));
            }
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ReleaseOrchestrator, ReleaseRequest};
    use crate::clock::FixedClock;
    use crate::config::PackageConfig;
    use crate::git::MockRepository;
    use crate::metadata::StaticName;
    use crate::tasks::TaskDescriptor;
    use chrono::DateTime;

    #[test]
    fn test_plan_lines_list_steps_and_tasks() {
        let mut repo = MockRepository::new();
        repo.checkout_branch("feature-x", "abc123");
        let config = PackageConfig {
            tasks: vec![TaskDescriptor::Mkdir {
                dir: "widget/extra".to_string(),
            }],
            ..PackageConfig::default()
        };
        let clock = FixedClock(DateTime::parse_from_rfc3339("2024-03-05T14:07:09+00:00").unwrap());

        let plan = ReleaseOrchestrator::new(repo, clock, StaticName("widget".to_string()), config)
            .plan(ReleaseRequest::new("/work"))
            .unwrap();
        let lines = plan_lines(&plan);

        assert!(lines.contains(&"Version: feature-x".to_string()));
        assert!(lines.contains(&"  4. custom-tasks".to_string()));
        assert!(lines.contains(&"     - mkdir widget/extra".to_string()));
        assert!(lines.iter().any(|l| l.ends_with("widget-feature-x.tar.gz")));
    }
}
