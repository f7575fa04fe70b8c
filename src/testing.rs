//! Helpers for unit tests that need a real repository on disk.

use git2::{Oid, Repository, Signature};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::domain::{ReleaseContext, ReleaseStamp};

/// Initialise a repository in a fresh temp dir
pub fn init_repo() -> (TempDir, Repository) {
    let dir = TempDir::new().expect("Could not create temp dir");
    let repo = Repository::init(dir.path()).expect("Could not init git repo");
    {
        let mut config = repo.config().expect("Could not get config");
        config
            .set_str("user.name", "Test User")
            .expect("Could not set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Could not set user.email");
    }
    (dir, repo)
}

/// Write `files` into the work tree, stage them and commit on HEAD
pub fn commit_files(repo: &Repository, files: &[(&str, &str)], message: &str) -> Oid {
    let root = repo.workdir().expect("Repository has no workdir").to_path_buf();
    let mut index = repo.index().expect("Could not get index");

    for (name, content) in files {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Could not create parent dir");
        }
        fs::write(&path, content).expect("Could not write file");
        index.add_path(Path::new(name)).expect("Could not add file to index");
    }
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");
    let sig = Signature::now("Test User", "test@example.com").expect("Could not get sig");
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("Could not create commit")
}

/// Release context rooted at `dir` with a fixed stamp
pub fn context(dir: &Path, name: &str, version: &str, keep: bool) -> ReleaseContext {
    ReleaseContext::new(
        name,
        version,
        dir,
        keep,
        ReleaseStamp {
            timestamp: 1_700_000_000,
            date: "2023-11-14".to_string(),
            time: "22:13:20".to_string(),
        },
    )
}
