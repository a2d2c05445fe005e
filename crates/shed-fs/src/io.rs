//! File reads and crash-safe writes.

use std::fs;
use std::io::Write;
use std::path::Path;

use fs2::FileExt;
use tempfile::{Builder, NamedTempFile};

use crate::{Error, NormalizedPath, Result};

/// Replace the contents of `path` without ever exposing a partial file.
///
/// The bytes go to a uniquely named, locked sibling temp file which is then
/// renamed over the target, so concurrent writers of one path never share a
/// staging file. Missing parent directories are created.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let target = path.to_native();
    let parent = match target.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            parent
        }
        None => Path::new("."),
    };

    let file_name = path.file_name().unwrap_or("file");
    let mut staging = Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| Error::io(parent, e))?;
    stage(&mut staging, content)?;
    // Dropping the handle on error removes the staging file
    staging
        .persist(&target)
        .map(drop)
        .map_err(|e| Error::io(&target, e.error))
}

fn stage(staging: &mut NamedTempFile, content: &[u8]) -> Result<()> {
    let path = staging.path().to_path_buf();
    let file = staging.as_file_mut();
    file.lock_exclusive()
        .map_err(|_| Error::LockFailed { path: path.clone() })?;
    file.write_all(content)
        .and_then(|()| file.sync_all())
        .map_err(|e| Error::io(&path, e))?;
    file.unlock().map_err(|_| Error::LockFailed { path })
}

pub fn read_text(path: &NormalizedPath) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path.to_native(), e))
}

pub fn read_bytes(path: &NormalizedPath) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::io(path.to_native(), e))
}
