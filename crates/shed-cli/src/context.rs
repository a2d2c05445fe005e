//! Shared state loaded once per invocation.

use std::path::Path;
use std::sync::Arc;

use shed_core::{Extractor, JsonFileStore, Repository, ShedConfig};
use shed_fs::NormalizedPath;
use shed_vcs::{GitRevisionSource, RevisionSource};
use tracing::debug;

use crate::cli::RepoTarget;
use crate::error::{CliError, Result};

pub struct Context {
    pub config: ShedConfig,
    pub extractor: Extractor,
}

impl Context {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let config = ShedConfig::load_or_default(&NormalizedPath::new(path))?;
        debug!(config = %path.display(), store = %config.store_path.display(), "Loaded configuration");
        let store = Arc::new(JsonFileStore::new(config.store_path.as_path()));
        let extractor = Extractor::new(config.clone(), store);
        Ok(Self { config, extractor })
    }

    /// Resolve the repository identity and open its history.
    pub fn open(&self, target: &RepoTarget) -> Result<(Repository, GitRevisionSource)> {
        let source = GitRevisionSource::open(&target.repo)?
            .with_excluded_dirs(self.config.excluded_dirs.clone());
        let name = match &target.name {
            Some(name) => name.clone(),
            None => source
                .working_dir()
                .file_name()
                .map(str::to_string)
                .ok_or_else(|| CliError::user("Cannot derive a repository name; pass --name"))?,
        };
        let repository = Repository::new(format!("{}/{}", target.owner, name), name, &target.owner);
        Ok((repository, source))
    }
}
