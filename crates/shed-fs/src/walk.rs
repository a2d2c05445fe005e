//! Recursive working-copy walk with an explicit directory exclusion set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::trace;
use walkdir::{DirEntry, WalkDir};

use crate::{Error, NormalizedPath, Result};

/// Directory names skipped during a walk, matched against whole components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExcludedDirs {
    names: BTreeSet<String>,
}

impl ExcludedDirs {
    /// An exclusion set that skips nothing.
    pub fn none() -> Self {
        Self {
            names: BTreeSet::new(),
        }
    }

    /// Build an exclusion set from directory names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a directory name to the set.
    pub fn with(mut self, name: impl Into<String>) -> Self {
        self.names.insert(name.into());
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for ExcludedDirs {
    /// Version-control internals of the backends a repository may use.
    fn default() -> Self {
        Self::new([".git", ".hg"])
    }
}

/// List every regular file under `root`, relative to `root`, sorted.
///
/// Directories whose name is in `excluded` are pruned without descending.
pub fn walk_files(root: &NormalizedPath, excluded: &ExcludedDirs) -> Result<Vec<NormalizedPath>> {
    let native_root = root.to_native();
    let keep = |entry: &DirEntry| {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        let skip = excluded.contains(&name);
        if skip {
            trace!(directory = %name, "Excluding directory");
        }
        !skip
    };

    let mut files = Vec::new();
    for entry in WalkDir::new(&native_root)
        .follow_links(false)
        .into_iter()
        .filter_entry(keep)
    {
        let entry = entry.map_err(|e| Error::Walk {
            root: native_root.clone(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(&native_root)
            .map(NormalizedPath::new)
            .map_err(|e| Error::Walk {
                root: native_root.clone(),
                message: e.to_string(),
            })?;
        files.push(relative);
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_excludes_vcs_internals() {
        let excluded = ExcludedDirs::default();
        assert!(excluded.contains(".git"));
        assert!(excluded.contains(".hg"));
        assert!(!excluded.contains("tools"));
    }

    #[test]
    fn with_extends_the_set() {
        let excluded = ExcludedDirs::none().with("node_modules");
        assert_eq!(excluded.iter().collect::<Vec<_>>(), vec!["node_modules"]);
    }
}
