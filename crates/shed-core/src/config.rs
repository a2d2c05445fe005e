//! Engine configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use shed_fs::{ConfigStore, ExcludedDirs, NormalizedPath};

use crate::{AuthenticatedCodec, Error, Result};

/// Settings shared by every extraction run.
///
/// Loaded from `.toml`, `.json` or `.yaml`; every field has a default so a
/// partial file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShedConfig {
    /// Host name embedded in tool guids
    pub host: String,
    /// JSON file holding metadata records
    pub store_path: PathBuf,
    /// Directory that receives installed location files
    pub tool_data_path: PathBuf,
    pub excluded_dirs: ExcludedDirs,
    pub codec_secret: Option<String>,
}

impl Default for ShedConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            store_path: PathBuf::from("shed-metadata.json"),
            tool_data_path: PathBuf::from("tool-data"),
            excluded_dirs: ExcludedDirs::default(),
            codec_secret: None,
        }
    }
}

impl ShedConfig {
    /// Load from `path`, picking the format from its extension.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound {
                path: path.to_native(),
            });
        }
        Ok(ConfigStore::new().load(path)?)
    }

    /// Load from `path` when it exists, otherwise use defaults.
    pub fn load_or_default(path: &NormalizedPath) -> Result<Self> {
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn codec(&self) -> Result<AuthenticatedCodec> {
        let secret = self.codec_secret.as_deref().ok_or(Error::MissingSecret)?;
        Ok(AuthenticatedCodec::new(secret)?)
    }
}
