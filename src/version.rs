use crate::domain::{Provenance, ResolvedVersion};
use crate::error::Result;
use crate::git::RepositoryReader;

/// Resolves the version string describing the current HEAD.
///
/// Candidates are applied from lowest to highest precedence, each one
/// overriding the previous:
/// - **Commit**: the raw commit hash, so a version always exists
/// - **Branch**: the first local branch HEAD is attached to
/// - **Tag**: the last tag pointing at the current commit
///
/// Ties are broken by the reader's enumeration order (see
/// [RepositoryReader]).
///
/// # Returns
/// * `Ok(ResolvedVersion)` - Exactly one version
/// * `Err` - Only if the repository state cannot be read
///
/// # Example
/// ```
/// use git_package::git::MockRepository;
/// use git_package::version::resolve_version;
///
/// let mut repo = MockRepository::new();
/// repo.checkout_branch("feature-x", "abc123");
/// assert_eq!(resolve_version(&repo).unwrap().as_str(), "feature-x");
///
/// repo.add_tag("v1.2.0", "abc123");
/// assert_eq!(resolve_version(&repo).unwrap().as_str(), "v1.2.0");
/// ```
pub fn resolve_version<R: RepositoryReader + ?Sized>(repo: &R) -> Result<ResolvedVersion> {
    let hash = repo.current_commit_hash()?;
    let revision = repo.current_revision()?;

    let mut version = ResolvedVersion::new(&hash, Provenance::Commit);

    let branches = repo.local_branches()?;
    let mut current = branches.iter().filter(|b| b.is_current(&revision));
    if let Some(branch) = current.next() {
        let others: Vec<&str> = current.map(|b| b.name.as_str()).collect();
        if !others.is_empty() {
            log::warn!(
                "HEAD matches several local branches; using '{}' over {:?}",
                branch.name,
                others
            );
        }
        version = ResolvedVersion::new(&branch.name, Provenance::Branch);
    }

    let tags = repo.tags_for_commit(&hash)?;
    if let Some(tag) = tags.last() {
        if tags.len() > 1 {
            log::debug!("{} tags point at {}; using '{}'", tags.len(), hash, tag.name);
        }
        version = ResolvedVersion::new(&tag.name, Provenance::Tag);
    }

    log::debug!(
        "Resolved version '{}' from {}",
        version,
        version.provenance().label()
    );
    Ok(version)
}
