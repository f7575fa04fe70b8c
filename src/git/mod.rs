//! Read-only git access
//!
//! This module provides a trait-based abstraction over the repository state
//! needed to resolve a release version, with a real implementation and an
//! in-memory one for tests.
//!
//! # Overview
//!
//! The primary abstraction is the [RepositoryReader] trait. The concrete
//! implementations are:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for testing
//!
//! # Usage
//!
//! Version resolution depends on the [RepositoryReader] trait rather than a
//! concrete implementation.
//!
//! ```rust
//! # use git_package::git::RepositoryReader;
//! # fn example<R: RepositoryReader>(repo: &R) -> git_package::Result<()> {
//! let hash = repo.current_commit_hash()?;
//! let tags = repo.tags_for_commit(&hash)?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::{Branch, Tag};
use crate::error::Result;

/// Read-only view over a local git repository
///
/// Implementations never write to the repository.
///
/// ## Enumeration order
///
/// Version resolution breaks ties by position: the first matching branch and
/// the last matching tag win. Implementations must therefore return
/// [local_branches](RepositoryReader::local_branches) and
/// [tags_for_commit](RepositoryReader::tags_for_commit) in a stable,
/// documented order. [Git2Repository] sorts both by name.
///
/// ## Implementations
///
/// - [Git2Repository](repository::Git2Repository): Real Git implementation using the `git2` crate
/// - [MockRepository](mock::MockRepository): Keeps insertion order
pub trait RepositoryReader {
    /// Get the full hash of the commit HEAD resolves to
    ///
    /// # Returns
    /// * `Ok(String)` - Hex commit hash
    /// * `Err` - If HEAD is unborn (no commits) or cannot be read
    fn current_commit_hash(&self) -> Result<String>;

    /// Get the marker describing where HEAD points
    ///
    /// Comparable with [Branch::revision]: `refs/heads/<name>` when HEAD is
    /// attached to a branch, the commit hash when detached.
    fn current_revision(&self) -> Result<String>;

    /// Get all local branches
    ///
    /// Remote-tracking branches are never returned.
    fn local_branches(&self) -> Result<Vec<Branch>>;

    /// Get every tag whose target is exactly `hash`
    ///
    /// Annotated tags are peeled to the commit they point at. May be empty.
    fn tags_for_commit(&self, hash: &str) -> Result<Vec<Tag>>;
}
