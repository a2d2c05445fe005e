//! Slash-separated paths shared by the working copy and history lookups.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path spelled with `/` separators on every platform.
///
/// Repository file names are compared, hashed and persisted in this form, so
/// a working-copy walk and a history lookup agree on the same spelling of a
/// file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath(String);

impl NormalizedPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self(path.as_ref().to_string_lossy().replace('\\', "/"))
    }

    /// Resolve `path` on disk, following symlinks.
    ///
    /// `dunce` keeps Windows results free of the `\\?\` prefix.
    pub fn canonical(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        dunce::canonicalize(path)
            .map(Self::new)
            .map_err(|e| Error::io(path, e))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.0)
    }

    /// Append `segment`, which may itself contain separators.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        match self.0.as_str() {
            "" => Self(segment),
            base if base.ends_with('/') => Self(format!("{base}{segment}")),
            base => Self(format!("{base}/{segment}")),
        }
    }

    /// The containing directory, or `None` for a bare file name.
    pub fn parent(&self) -> Option<Self> {
        let (head, _) = self.trimmed().rsplit_once('/')?;
        Some(if head.is_empty() {
            Self("/".to_string())
        } else {
            Self(head.to_string())
        })
    }

    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.trimmed();
        let name = trimmed.rsplit_once('/').map_or(trimmed, |(_, name)| name);
        (!name.is_empty()).then_some(name)
    }

    /// Text after the last dot of the file name; dotfiles have none.
    pub fn extension(&self) -> Option<&str> {
        match self.file_name()?.rsplit_once('.') {
            Some(("", _)) | None => None,
            Some((_, extension)) => Some(extension),
        }
    }

    pub fn exists(&self) -> bool {
        Path::new(&self.0).exists()
    }

    pub fn is_dir(&self) -> bool {
        Path::new(&self.0).is_dir()
    }

    pub fn is_file(&self) -> bool {
        Path::new(&self.0).is_file()
    }

    fn trimmed(&self) -> &str {
        self.0.trim_end_matches('/')
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NormalizedPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for NormalizedPath {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}
