use std::path::{Path, PathBuf};

use shed_fs::{NormalizedPath, SAMPLE_SUFFIX};
use shed_vcs::{ResolvedRevision, RevisionSource};
use tracing::{debug, info};

use crate::Result;

/// Installs `X.sample` files as `X` into the tool data directory.
#[derive(Debug, Clone)]
pub struct SampleInstaller {
    target_dir: PathBuf,
}

impl SampleInstaller {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
        }
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Copy `sample` at `revision` into the target directory.
    ///
    /// An existing file is never overwritten; it may hold an administrator's
    /// real data. Returns the installed path, or `None` when skipped.
    pub fn install(
        &self,
        source: &dyn RevisionSource,
        revision: &ResolvedRevision,
        sample: &NormalizedPath,
    ) -> Result<Option<NormalizedPath>> {
        let Some(name) = sample
            .file_name()
            .and_then(|name| name.strip_suffix(SAMPLE_SUFFIX))
            .filter(|name| !name.is_empty())
        else {
            return Ok(None);
        };
        let target = NormalizedPath::new(self.target_dir.join(name));
        if target.exists() {
            debug!(target = %target, "Location file already installed");
            return Ok(None);
        }

        let content = source.read_file(revision, sample)?;
        shed_fs::io::write_atomic(&target, &content)?;
        info!(sample = %sample, target = %target, "Installed sample file");
        Ok(Some(target))
    }
}
