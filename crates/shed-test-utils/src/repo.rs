//! [`ShedRepo`] builder for tool shed test scenarios.

use std::fs;
use std::path::Path;

use git2::{IndexAddOption, Repository, Signature};
use tempfile::TempDir;

/// A temporary git repository with helpers for writing files and committing.
///
/// Every [`commit`](Self::commit) creates a real git commit via `git2`, so
/// history lookups behave as they would on a hosted repository.
///
/// # Example
///
/// ```rust,no_run
/// use shed_test_utils::ShedRepo;
///
/// let repo = ShedRepo::new();
/// repo.write("filtering.xml", "<tool id=\"filter_tool\" name=\"Filter\"/>");
/// let revision = repo.commit("Uploaded filtering tool");
/// assert_eq!(revision.len(), 12);
/// ```
pub struct ShedRepo {
    temp_dir: TempDir,
    repo: Repository,
}

impl Default for ShedRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl ShedRepo {
    /// Initialise an empty repository in a fresh temporary directory.
    ///
    /// # Panics
    /// Panics if the directory or repository cannot be created.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("ShedRepo::new: failed to create temp dir");
        let repo = Repository::init(temp_dir.path()).unwrap_or_else(|e| {
            panic!(
                "ShedRepo::new: failed to init repository at {}: {e}",
                temp_dir.path().display()
            )
        });
        Self { temp_dir, repo }
    }

    /// Root of the working copy.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to `path` (relative to the root), creating parents.
    pub fn write(&self, path: &str, content: &str) {
        let full_path = self.root().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("ShedRepo::write: failed to write {path}: {e}"));
    }

    /// Delete `path` (relative to the root) from the working copy.
    pub fn remove(&self, path: &str) {
        fs::remove_file(self.root().join(path))
            .unwrap_or_else(|e| panic!("ShedRepo::remove: failed to remove {path}: {e}"));
    }

    /// Stage every change in the working copy and commit it.
    ///
    /// Returns the 12-character abbreviated revision of the new commit.
    ///
    /// # Panics
    /// Panics if any git operation fails.
    pub fn commit(&self, message: &str) -> String {
        let mut index = self.repo.index().unwrap();
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .unwrap();
        index.update_all(["*"].iter(), None).unwrap();
        index.write().unwrap();

        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let signature = Signature::now("Test User", "test@test.com").unwrap();

        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .unwrap_or_else(|e| panic!("ShedRepo::commit: failed to commit: {e}"));

        oid.to_string()[..12].to_string()
    }
}
