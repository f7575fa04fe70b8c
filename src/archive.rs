//! tar/gzip helpers used by the unpack and compress steps.

use flate2::{write::GzEncoder, Compression};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tar::HeaderMode;
use walkdir::WalkDir;

use crate::error::{GitPackageError, Result};

/// Extract a plain tar archive into `dest`, creating it if needed
pub fn unpack_tar(artifact: &Path, dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)?;
    tar::Archive::new(File::open(artifact)?).unpack(dest)?;
    Ok(())
}

/// Create a gzip-compressed tar of `src_dir` at `dest`.
///
/// Every entry is stored under `prefix/`. Entries are sorted by name and
/// written with deterministic headers, so the same tree always produces the
/// same bytes.
pub fn tar_gz_dir(src_dir: &Path, prefix: &str, dest: &Path) -> Result<()> {
    let enc = GzEncoder::new(File::create(dest)?, Compression::default());
    let mut tar = tar::Builder::new(enc);

    for entry in WalkDir::new(src_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            GitPackageError::Io(io::Error::new(io::ErrorKind::Other, e.to_string()))
        })?;
        let path = entry.path();
        let rel_path = path
            .strip_prefix(src_dir)
            .map_err(|e| GitPackageError::Io(io::Error::new(io::ErrorKind::Other, e)))?;
        let archived = Path::new(prefix).join(rel_path);

        let metadata = std::fs::symlink_metadata(path)?;
        let mut header = tar::Header::new_gnu();
        header.set_metadata_in_mode(&metadata, HeaderMode::Deterministic);

        if entry.file_type().is_symlink() {
            let target = std::fs::read_link(path)?;
            header.set_size(0);
            tar.append_link(&mut header, &archived, target)?;
        } else if entry.file_type().is_dir() {
            tar.append_data(&mut header, &archived, &mut io::empty())?;
        } else {
            let mut file = File::open(path)?;
            tar.append_data(&mut header, &archived, &mut file)?;
        }
    }

    let enc = tar.into_inner()?;
    let mut finished = enc.finish()?;
    finished.flush()?;
    Ok(())
}
