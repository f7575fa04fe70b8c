use std::path::{Path, PathBuf};

/// Release timestamp rendered once per invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseStamp {
    pub timestamp: i64,
    pub date: String,
    pub time: String,
}

/// Everything the packaging steps need to know about one release.
///
/// Built once by the orchestrator and passed by reference to every step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseContext {
    pub name: String,
    pub version: String,
    pub working_dir: PathBuf,
    pub keep: bool,
    pub stamp: ReleaseStamp,
}

impl ReleaseContext {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        working_dir: impl Into<PathBuf>,
        keep: bool,
        stamp: ReleaseStamp,
    ) -> Self {
        ReleaseContext {
            name: name.into(),
            version: version.into(),
            working_dir: working_dir.into(),
            keep,
            stamp,
        }
    }

    /// Archive filename, e.g. "widget-v1.2.0.tar.gz"
    pub fn archive_name(&self) -> String {
        format!("{}-{}.tar.gz", self.name, self.version)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.working_dir.join(self.archive_name())
    }

    /// Compress writes here first and renames onto `archive_path` when done
    pub fn partial_archive_path(&self) -> PathBuf {
        self.working_dir
            .join(format!("{}.partial", self.archive_name()))
    }

    pub fn release_dir(&self) -> PathBuf {
        self.working_dir.join(&self.name)
    }

    /// Intermediate tar holding the tracked tree of HEAD
    pub fn snapshot_path(&self) -> PathBuf {
        self.working_dir.join(format!("{}.snapshot.tar", self.name))
    }

    /// Resolve a task path against the working directory
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.working_dir.join(path)
    }

    /// Value for a `${package.<key>}` placeholder
    pub fn placeholder(&self, key: &str) -> Option<String> {
        let value = match key {
            "name" => self.name.clone(),
            "version" => self.version.clone(),
            "archive" => self.archive_name(),
            "release_dir" => self.name.clone(),
            "date" => self.stamp.date.clone(),
            "time" => self.stamp.time.clone(),
            "timestamp" => self.stamp.timestamp.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ReleaseContext {
        ReleaseContext::new(
            "widget",
            "v1.2.0",
            "/work",
            false,
            ReleaseStamp {
                timestamp: 1_700_000_000,
                date: "2023-11-14".to_string(),
                time: "22:13:20".to_string(),
            },
        )
    }

    #[test]
    fn test_archive_name() {
        assert_eq!(context().archive_name(), "widget-v1.2.0.tar.gz");
    }

    #[test]
    fn test_paths_live_in_working_dir() {
        let ctx = context();
        assert_eq!(ctx.archive_path(), PathBuf::from("/work/widget-v1.2.0.tar.gz"));
        assert_eq!(ctx.release_dir(), PathBuf::from("/work/widget"));
        assert_eq!(ctx.snapshot_path(), PathBuf::from("/work/widget.snapshot.tar"));
        assert_eq!(
            ctx.partial_archive_path(),
            PathBuf::from("/work/widget-v1.2.0.tar.gz.partial")
        );
    }

    #[test]
    fn test_placeholders() {
        let ctx = context();
        assert_eq!(ctx.placeholder("version").as_deref(), Some("v1.2.0"));
        assert_eq!(ctx.placeholder("timestamp").as_deref(), Some("1700000000"));
        assert_eq!(ctx.placeholder("date").as_deref(), Some("2023-11-14"));
        assert_eq!(ctx.placeholder("nope"), None);
    }
}
