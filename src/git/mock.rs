use crate::domain::{Branch, Tag};
use crate::error::{GitPackageError, Result};
use crate::git::RepositoryReader;

/// In-memory repository for testing without actual git operations
///
/// Branches and tags are returned in insertion order, which makes the
/// resolver's positional tie-breaks easy to exercise.
pub struct MockRepository {
    head_commit: Option<String>,
    head_revision: Option<String>,
    branches: Vec<Branch>,
    tags: Vec<Tag>,
}

impl MockRepository {
    /// Create a new repository with no commits
    pub fn new() -> Self {
        MockRepository {
            head_commit: None,
            head_revision: None,
            branches: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Detach HEAD at `hash`
    pub fn detach_head(&mut self, hash: impl Into<String>) {
        let hash = hash.into();
        self.head_revision = Some(hash.clone());
        self.head_commit = Some(hash);
    }

    /// Attach HEAD to local branch `name` at `hash`, adding the branch
    pub fn checkout_branch(&mut self, name: impl Into<String>, hash: impl Into<String>) {
        let branch = Branch::local(name, hash);
        self.head_commit = Some(branch.commit.clone());
        self.head_revision = Some(branch.revision.clone());
        self.branches.push(branch);
    }

    /// Force the HEAD revision marker, e.g. to simulate branch aliases
    pub fn set_head_revision(&mut self, revision: impl Into<String>) {
        self.head_revision = Some(revision.into());
    }

    /// Add a branch without moving HEAD
    pub fn add_branch(&mut self, branch: Branch) {
        self.branches.push(branch);
    }

    /// Add a tag pointing to a commit
    pub fn add_tag(&mut self, name: impl Into<String>, hash: impl Into<String>) {
        self.tags.push(Tag::new(name, hash));
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryReader for MockRepository {
    fn current_commit_hash(&self) -> Result<String> {
        self.head_commit
            .clone()
            .ok_or_else(|| GitPackageError::repository("Repository has no commits"))
    }

    fn current_revision(&self) -> Result<String> {
        self.head_revision
            .clone()
            .ok_or_else(|| GitPackageError::repository("Repository has no commits"))
    }

    fn local_branches(&self) -> Result<Vec<Branch>> {
        Ok(self.branches.iter().filter(|b| b.is_local).cloned().collect())
    }

    fn tags_for_commit(&self, hash: &str) -> Result<Vec<Tag>> {
        Ok(self.tags.iter().filter(|t| t.targets(hash)).cloned().collect())
    }
}
