use crate::domain::{Branch, Tag};
use crate::error::{GitPackageError, Result};
use git2::{BranchType, ErrorCode, ObjectType, Repository as Git2Repo, TreeWalkMode, TreeWalkResult};
use std::fs::File;
use std::io;
use std::path::Path;

const MODE_EXECUTABLE: i32 = 0o100755;
const MODE_SYMLINK: i32 = 0o120000;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl std::fmt::Debug for Git2Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git2Repository")
            .field("path", &self.repo.path())
            .finish()
    }
}

/// One entry of a tree listing, collected before writing the archive
struct SnapshotEntry {
    path: String,
    oid: git2::Oid,
    kind: ObjectType,
    filemode: i32,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::discover(path).map_err(|e| {
            GitPackageError::repository(format!(
                "Not a git repository ({}): {}",
                path.display(),
                e.message()
            ))
        })?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn head_commit(&self) -> Result<git2::Commit<'_>> {
        let head = self.repo.head().map_err(|e| match e.code() {
            ErrorCode::UnbornBranch | ErrorCode::NotFound => {
                GitPackageError::repository("Repository has no commits")
            }
            _ => GitPackageError::repository(format!("Cannot read HEAD: {}", e.message())),
        })?;

        head.peel_to_commit().map_err(|e| {
            GitPackageError::repository(format!("HEAD does not point at a commit: {}", e.message()))
        })
    }

    /// Write the committed tree of HEAD to `dest` as an uncompressed tar.
    ///
    /// Only tracked, committed content is exported: the working tree and the
    /// index are never consulted. Entries carry the commit time as mtime,
    /// executable bits and symlinks are preserved, submodules are skipped.
    pub fn export_head(&self, dest: &Path) -> Result<()> {
        let commit = self.head_commit()?;
        let tree = commit.tree()?;
        let mtime = commit.time().seconds().max(0) as u64;

        let mut entries = Vec::new();
        let mut bad_name = None;
        tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            let name = match std::str::from_utf8(entry.name_bytes()) {
                Ok(name) => name,
                Err(_) => {
                    let lossy = String::from_utf8_lossy(entry.name_bytes()).into_owned();
                    bad_name.get_or_insert(format!("{}{}", root, lossy));
                    return TreeWalkResult::Skip;
                }
            };
            if let Some(kind) = entry.kind() {
                entries.push(SnapshotEntry {
                    path: format!("{}{}", root, name),
                    oid: entry.id(),
                    kind,
                    filemode: entry.filemode(),
                });
            }
            TreeWalkResult::Ok
        })?;

        if let Some(name) = bad_name {
            return Err(GitPackageError::repository(format!(
                "Tracked path is not valid UTF-8: {}",
                name
            )));
        }

        let mut builder = tar::Builder::new(File::create(dest)?);

        for entry in entries {
            let mut header = tar::Header::new_gnu();
            header.set_mtime(mtime);
            header.set_uid(0);
            header.set_gid(0);

            match entry.kind {
                ObjectType::Tree => {
                    header.set_entry_type(tar::EntryType::Directory);
                    header.set_mode(0o755);
                    header.set_size(0);
                    builder.append_data(&mut header, format!("{}/", entry.path), io::empty())?;
                }
                ObjectType::Blob => {
                    let blob = self.repo.find_blob(entry.oid)?;

                    if entry.filemode == MODE_SYMLINK {
                        let target = std::str::from_utf8(blob.content()).map_err(|_| {
                            GitPackageError::repository(format!(
                                "Symlink target is not valid UTF-8: {}",
                                entry.path
                            ))
                        })?;
                        header.set_entry_type(tar::EntryType::Symlink);
                        header.set_mode(0o777);
                        header.set_size(0);
                        builder.append_link(&mut header, &entry.path, target)?;
                    } else {
                        let mode = if entry.filemode == MODE_EXECUTABLE {
                            0o755
                        } else {
                            0o644
                        };
                        header.set_entry_type(tar::EntryType::Regular);
                        header.set_mode(mode);
                        header.set_size(blob.content().len() as u64);
                        builder.append_data(&mut header, &entry.path, blob.content())?;
                    }
                }
                ObjectType::Commit => {
                    log::debug!("Skipping submodule entry {}", entry.path);
                }
                other => {
                    log::warn!("Skipping unexpected {:?} entry {}", other, entry.path);
                }
            }
        }

        builder.into_inner()?;
        Ok(())
    }
}

impl super::RepositoryReader for Git2Repository {
    fn current_commit_hash(&self) -> Result<String> {
        Ok(self.head_commit()?.id().to_string())
    }

    fn current_revision(&self) -> Result<String> {
        let commit = self.head_commit()?;

        if self.repo.head_detached()? {
            return Ok(commit.id().to_string());
        }

        let head = self.repo.head()?;
        match head.name() {
            Some(name) => Ok(name.to_string()),
            None => Ok(commit.id().to_string()),
        }
    }

    fn local_branches(&self) -> Result<Vec<Branch>> {
        let mut branches = Vec::new();

        for item in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = item?;
            let name = match branch.name()? {
                Some(name) => name.to_string(),
                None => continue,
            };
            let commit = match branch.get().peel_to_commit() {
                Ok(commit) => commit.id().to_string(),
                Err(_) => continue,
            };

            branches.push(Branch::local(name, commit));
        }

        branches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(branches)
    }

    fn tags_for_commit(&self, hash: &str) -> Result<Vec<Tag>> {
        let mut tags = Vec::new();

        for name in self.repo.tag_names(None)?.iter().flatten() {
            let reference = match self.repo.find_reference(&format!("refs/tags/{}", name)) {
                Ok(reference) => reference,
                Err(_) => continue,
            };
            // Tags on trees or blobs cannot describe a commit
            let commit = match reference.peel_to_commit() {
                Ok(commit) => commit.id().to_string(),
                Err(_) => continue,
            };

            if commit == hash {
                tags.push(Tag::new(name, commit));
            }
        }

        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }
}
