//! Error types for shed-core

use std::path::PathBuf;

/// Result type for shed-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Infrastructure failures of the engine.
///
/// Problems with individual definition files are never errors here; they
/// are reported as invalid files in the extraction result.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration file not found at expected path
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// A record handed back to the store no longer exists in it
    #[error("Metadata record {id} not found for repository '{repository}'")]
    RecordNotFound { repository: String, id: u64 },

    /// The persisted store could not be decoded
    #[error("Corrupt metadata store at {path}: {message}")]
    CorruptStore { path: PathBuf, message: String },

    /// Codec operations need a configured secret
    #[error("No codec secret configured; set `codec_secret` in the configuration")]
    MissingSecret,

    #[error(transparent)]
    Codec(#[from] crate::codec::CodecError),

    // Transparent wrappers for underlying crate errors
    #[error(transparent)]
    Fs(#[from] shed_fs::Error),

    #[error(transparent)]
    Vcs(#[from] shed_vcs::Error),

    #[error(transparent)]
    Meta(#[from] shed_meta::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
