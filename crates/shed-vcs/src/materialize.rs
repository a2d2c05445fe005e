//! Scoped filesystem materialization of repository files.

use std::io::Write;
use std::path::Path;

use shed_fs::NormalizedPath;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::{Error, Result};

/// A repository file made available at a real filesystem path.
///
/// Tip files already live in the working copy. Historical content is written
/// to a private temporary file that is removed when this value is dropped, on
/// every exit path of the caller.
#[derive(Debug)]
pub enum MaterializedFile {
    /// File read in place from the working copy
    WorkingCopy(NormalizedPath),
    /// Historical content copied into a temporary file
    Temporary(NamedTempFile),
}

impl MaterializedFile {
    /// Write `content` into a fresh temporary file named after `path`.
    pub fn temporary(path: &NormalizedPath, content: &[u8]) -> Result<Self> {
        let map_err = |source| Error::Materialize {
            path: path.to_string(),
            source,
        };
        let suffix = format!("-{}", path.file_name().unwrap_or("file"));
        let mut file = tempfile::Builder::new()
            .prefix("shed-")
            .suffix(&suffix)
            .tempfile()
            .map_err(map_err)?;
        file.write_all(content).map_err(map_err)?;
        file.flush().map_err(map_err)?;
        debug!(file = %path, temp = %file.path().display(), "Materialized historical file");
        Ok(Self::Temporary(file))
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::WorkingCopy(path) => path.as_ref(),
            Self::Temporary(file) => file.path(),
        }
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Temporary(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temporary_file_is_removed_on_drop() {
        let materialized =
            MaterializedFile::temporary(&NormalizedPath::new("tools/filtering.xml"), b"<tool/>")
                .unwrap();
        let path = materialized.path().to_path_buf();
        assert!(path.exists());
        assert!(path.to_string_lossy().ends_with("-filtering.xml"));
        assert_eq!(std::fs::read(&path).unwrap(), b"<tool/>");

        drop(materialized);
        assert!(!path.exists());
    }

    #[test]
    fn working_copy_path_is_passed_through() {
        let materialized = MaterializedFile::WorkingCopy(NormalizedPath::new("/repo/filtering.xml"));
        assert!(!materialized.is_temporary());
        assert_eq!(materialized.path(), Path::new("/repo/filtering.xml"));
    }
}
