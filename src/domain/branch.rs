/// Prefix of the revision pointer carried by every local branch
pub const LOCAL_BRANCH_PREFIX: &str = "refs/heads/";

/// Represents a git branch and the commit it currently points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    /// Revision pointer comparable with the HEAD revision marker
    pub revision: String,
    pub commit: String,
    pub is_local: bool,
}

impl Branch {
    /// Create a local branch pointing at `commit`
    pub fn local(name: impl Into<String>, commit: impl Into<String>) -> Self {
        let name = name.into();
        let revision = format!("{}{}", LOCAL_BRANCH_PREFIX, name);

        Branch {
            name,
            revision,
            commit: commit.into(),
            is_local: true,
        }
    }

    /// Create a remote-tracking branch (e.g. "origin/main") pointing at `commit`
    pub fn remote(name: impl Into<String>, commit: impl Into<String>) -> Self {
        let name = name.into();
        let revision = format!("refs/remotes/{}", name);

        Branch {
            name,
            revision,
            commit: commit.into(),
            is_local: false,
        }
    }

    /// Check whether HEAD is currently on this branch
    pub fn is_current(&self, head_revision: &str) -> bool {
        self.is_local && self.revision == head_revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_branch_revision() {
        let branch = Branch::local("main", "abc123");
        assert_eq!(branch.revision, "refs/heads/main");
        assert!(branch.is_local);
    }

    #[test]
    fn test_is_current_matches_revision_not_commit() {
        let branch = Branch::local("main", "abc123");
        assert!(branch.is_current("refs/heads/main"));
        // Detached HEAD at the same commit is not "on" the branch
        assert!(!branch.is_current("abc123"));
    }

    #[test]
    fn test_remote_branch_never_current() {
        let branch = Branch::remote("origin/main", "abc123");
        assert!(!branch.is_local);
        assert!(!branch.is_current("refs/remotes/origin/main"));
    }
}
