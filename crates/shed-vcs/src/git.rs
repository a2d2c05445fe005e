//! Git-backed revision source

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use git2::{
    Commit, ErrorCode, ObjectType, Oid, Repository, Sort, Tree, TreeWalkMode, TreeWalkResult,
};
use shed_fs::{ExcludedDirs, NormalizedPath, io, walk};
use tracing::debug;

use crate::changeset::short_revision;
use crate::{Changeset, Error, ResolvedRevision, Result, RevisionSource};

/// Revision source over a git repository with a checked-out working copy.
///
/// The tip is the commit `HEAD` points to. Handles are opened per call so the
/// source can be shared across threads.
#[derive(Debug, Clone)]
pub struct GitRevisionSource {
    root: NormalizedPath,
    excluded: ExcludedDirs,
}

impl GitRevisionSource {
    /// Open the repository whose working copy is at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = NormalizedPath::canonical(root)?;
        Repository::open(root.to_native())?;
        Ok(Self {
            root,
            excluded: ExcludedDirs::default(),
        })
    }

    /// Replace the directory names skipped when walking the working copy.
    pub fn with_excluded_dirs(mut self, excluded: ExcludedDirs) -> Self {
        self.excluded = excluded;
        self
    }

    fn repository(&self) -> Result<Repository> {
        Ok(Repository::open(self.root.to_native())?)
    }

    /// Tree of a historical changeset, looked up by its full id.
    fn tree_at<'r>(repo: &'r Repository, at: &ResolvedRevision) -> Result<Tree<'r>> {
        Ok(repo.find_commit(Oid::from_str(&at.changeset.id)?)?.tree()?)
    }

    fn is_excluded(&self, path: &str) -> bool {
        path.split('/').any(|component| self.excluded.contains(component))
    }
}

fn to_changeset(ordinal: usize, commit: &Commit<'_>) -> Changeset {
    let id = commit.id().to_string();
    let timestamp: DateTime<Utc> = Utc
        .timestamp_opt(commit.time().seconds(), 0)
        .single()
        .unwrap_or_default();
    let message = commit
        .message()
        .unwrap_or("")
        .lines()
        .next()
        .unwrap_or("")
        .to_string();
    let author = commit.author().name().unwrap_or("Unknown").to_string();

    Changeset {
        ordinal,
        revision: short_revision(&id),
        id,
        author,
        message,
        timestamp,
    }
}

impl RevisionSource for GitRevisionSource {
    fn working_dir(&self) -> &NormalizedPath {
        &self.root
    }

    fn changesets(&self) -> Result<Vec<Changeset>> {
        let repo = self.repository()?;
        let head = match repo.head() {
            Ok(head) => head,
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let head_commit = head.peel_to_commit()?;

        let mut revwalk = repo.revwalk()?;
        revwalk.push(head_commit.id())?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;

        let mut changesets = Vec::new();
        for (ordinal, oid_result) in revwalk.enumerate() {
            let commit = repo.find_commit(oid_result?)?;
            changesets.push(to_changeset(ordinal, &commit));
        }
        Ok(changesets)
    }

    fn list_files(&self, at: &ResolvedRevision) -> Result<Vec<NormalizedPath>> {
        if at.is_tip {
            debug!(revision = %at.revision(), "Listing working copy files");
            return Ok(walk::walk_files(&self.root, &self.excluded)?);
        }

        let repo = self.repository()?;
        let tree = Self::tree_at(&repo, at)?;
        let mut files = Vec::new();
        tree.walk(TreeWalkMode::PreOrder, |dir, entry| {
            if entry.kind() == Some(ObjectType::Blob)
                && let Some(name) = entry.name()
            {
                let path = format!("{dir}{name}");
                if !self.is_excluded(&path) {
                    files.push(NormalizedPath::new(path));
                }
            }
            TreeWalkResult::Ok
        })?;
        files.sort();
        debug!(revision = %at.revision(), count = files.len(), "Listed historical files");
        Ok(files)
    }

    fn read_file(&self, at: &ResolvedRevision, path: &NormalizedPath) -> Result<Vec<u8>> {
        let not_found = || Error::FileNotFound {
            revision: at.revision().to_string(),
            path: path.to_string(),
        };

        if at.is_tip {
            let full = self.root.join(path.as_str());
            if !full.is_file() {
                return Err(not_found());
            }
            return Ok(io::read_bytes(&full)?);
        }

        let repo = self.repository()?;
        let tree = Self::tree_at(&repo, at)?;
        let entry = match tree.get_path(Path::new(path.as_str())) {
            Ok(entry) => entry,
            Err(e) if e.code() == ErrorCode::NotFound => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };
        let object = entry.to_object(&repo)?;
        let blob = object.peel_to_blob().map_err(|_| not_found())?;
        Ok(blob.content().to_vec())
    }
}
