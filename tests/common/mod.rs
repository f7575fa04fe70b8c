// Shared helpers for integration tests
#![allow(dead_code)]

use chrono::DateTime;
use git2::{Oid, Repository, Signature};
use git_package::clock::FixedClock;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Setup a temporary git repository with a configured user
pub fn setup_repo() -> (TempDir, Repository) {
    let temp_dir = TempDir::new().expect("Could not create temp dir");
    let repo = Repository::init(temp_dir.path()).expect("Could not init git repo");

    {
        let mut config = repo.config().expect("Could not get config");
        config
            .set_str("user.name", "Test User")
            .expect("Could not set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Could not set user.email");
    }

    (temp_dir, repo)
}

/// Write, stage and commit files on HEAD
pub fn commit(repo: &Repository, files: &[(&str, &str)], message: &str) -> Oid {
    let root = repo.workdir().expect("No workdir").to_path_buf();
    let mut index = repo.index().expect("Could not get index");

    for (name, content) in files {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Could not create dir");
        }
        fs::write(&path, content).expect("Could not write file");
        index
            .add_path(Path::new(name))
            .expect("Could not add file to index");
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

/// A project with a manifest and a couple of tracked files
pub fn setup_project() -> (TempDir, Repository, Oid) {
    let (dir, repo) = setup_repo();
    let oid = commit(
        &repo,
        &[
            ("Cargo.toml", "[package]\nname = \"widget\"\nversion = \"0.1.0\"\n"),
            ("README.md", "# widget\n"),
            ("css/site.css", "body {}\n"),
        ],
        "Initial commit",
    );
    (dir, repo, oid)
}

pub fn tag(repo: &Repository, name: &str, oid: Oid) {
    repo.tag_lightweight(name, &repo.find_object(oid, None).unwrap(), false)
        .expect("Could not create tag");
}

pub fn fixed_clock() -> FixedClock {
    FixedClock(DateTime::parse_from_rfc3339("2024-03-05T14:07:09+00:00").unwrap())
}
