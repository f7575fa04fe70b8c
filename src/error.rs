use thiserror::Error;

/// Unified error type for git-package operations
#[derive(Error, Debug)]
pub enum GitPackageError {
    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Task failed: {0}")]
    Task(String),

    #[error("Step '{step}' failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: Box<GitPackageError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-package
pub type Result<T> = std::result::Result<T, GitPackageError>;

impl GitPackageError {
    /// Create a repository error with context
    pub fn repository(msg: impl Into<String>) -> Self {
        GitPackageError::Repository(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitPackageError::Config(msg.into())
    }

    /// Create a metadata error with context
    pub fn metadata(msg: impl Into<String>) -> Self {
        GitPackageError::Metadata(msg.into())
    }

    /// Create a task error with context
    pub fn task(msg: impl Into<String>) -> Self {
        GitPackageError::Task(msg.into())
    }

    /// Wrap an error with the name of the packaging step that produced it
    pub fn step(step: &'static str, source: GitPackageError) -> Self {
        GitPackageError::Step {
            step,
            source: Box::new(source),
        }
    }

    /// Name of the failed packaging step, if this error came from one
    pub fn failed_step(&self) -> Option<&'static str> {
        match self {
            GitPackageError::Step { step, .. } => Some(step),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GitPackageError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GitPackageError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_step_error_names_step_and_cause() {
        let err = GitPackageError::step("custom-tasks", GitPackageError::task("copy failed"));
        let msg = err.to_string();
        assert!(msg.contains("custom-tasks"));
        assert!(msg.contains("copy failed"));
        assert_eq!(err.failed_step(), Some("custom-tasks"));
    }

    #[test]
    fn test_failed_step_none_for_plain_errors() {
        assert_eq!(GitPackageError::repository("x").failed_step(), None);
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (GitPackageError::repository("x"), "Repository error"),
            (GitPackageError::config("x"), "Configuration error"),
            (GitPackageError::metadata("x"), "Metadata error"),
            (GitPackageError::task("x"), "Task failed"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
