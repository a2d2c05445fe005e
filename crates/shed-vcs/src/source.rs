//! Revision source trait for backend-agnostic history access

use shed_fs::NormalizedPath;

use crate::{Changeset, Error, MaterializedFile, Result};

/// A revision looked up once, carrying what file access needs.
///
/// Obtained from [`RevisionSource::resolve`]; file access through it does
/// not search the history again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRevision {
    pub changeset: Changeset,
    /// Tip files are read from the working copy
    pub is_tip: bool,
}

impl ResolvedRevision {
    /// Abbreviated revision string.
    pub fn revision(&self) -> &str {
        &self.changeset.revision
    }
}

/// Read access to one repository's history and working copy.
///
/// Implementations must be cheap to share between threads; they should open
/// backend handles per call rather than hold them.
pub trait RevisionSource: Send + Sync {
    /// Root of the live working copy, reflecting the tip.
    fn working_dir(&self) -> &NormalizedPath;

    /// Every changeset, ordered from the root (ordinal 0) to the tip.
    fn changesets(&self) -> Result<Vec<Changeset>>;

    /// Repository-relative paths of every file present at `at`.
    ///
    /// For the tip this is the working copy; for any other revision it is
    /// the file set recorded in that changeset.
    fn list_files(&self, at: &ResolvedRevision) -> Result<Vec<NormalizedPath>>;

    /// Content of `path` as of `at`.
    fn read_file(&self, at: &ResolvedRevision, path: &NormalizedPath) -> Result<Vec<u8>>;

    /// Look `revision` up in a single pass over the history.
    fn resolve(&self, revision: &str) -> Result<ResolvedRevision> {
        let changesets = self.changesets()?;
        let tip_id = changesets.last().map(|tip| tip.id.clone());
        let changeset = changesets
            .into_iter()
            .find(|changeset| changeset.matches(revision))
            .ok_or_else(|| Error::RevisionNotFound {
                revision: revision.to_string(),
            })?;
        let is_tip = tip_id.as_deref() == Some(changeset.id.as_str());
        Ok(ResolvedRevision { changeset, is_tip })
    }

    /// The most recent changeset, or `None` for an empty history.
    fn tip(&self) -> Result<Option<Changeset>> {
        Ok(self.changesets()?.pop())
    }

    /// Look up a changeset by abbreviated or full revision string.
    fn find_changeset(&self, revision: &str) -> Result<Option<Changeset>> {
        Ok(self
            .changesets()?
            .into_iter()
            .find(|changeset| changeset.matches(revision)))
    }

    fn is_tip(&self, revision: &str) -> Result<bool> {
        Ok(self
            .tip()?
            .is_some_and(|changeset| changeset.matches(revision)))
    }

    fn revision_ordinal(&self, revision: &str) -> Result<Option<usize>> {
        Ok(self.find_changeset(revision)?.map(|changeset| changeset.ordinal))
    }

    /// Label of the form `"<ordinal>:<revision>"`, or `"-1:<revision>"`
    /// when the revision is unknown.
    fn revision_label(&self, revision: &str) -> Result<String> {
        Ok(match self.find_changeset(revision)? {
            Some(changeset) => changeset.label(),
            None => format!("-1:{revision}"),
        })
    }

    /// Make `path` at `at` available at a real filesystem path.
    ///
    /// Tip files are served from the working copy; historical content goes
    /// to a scoped temporary file.
    fn materialize(&self, at: &ResolvedRevision, path: &NormalizedPath) -> Result<MaterializedFile> {
        if at.is_tip {
            let full = self.working_dir().join(path.as_str());
            if !full.is_file() {
                return Err(Error::FileNotFound {
                    revision: at.revision().to_string(),
                    path: path.to_string(),
                });
            }
            return Ok(MaterializedFile::WorkingCopy(full));
        }
        let content = self.read_file(at, path)?;
        MaterializedFile::temporary(path, &content)
    }
}
