//! Error types for shed-vcs

/// Result type for shed-vcs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in shed-vcs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] shed_fs::Error),

    #[error("Repository does not include revision '{revision}'")]
    RevisionNotFound { revision: String },

    #[error("File '{path}' does not exist at revision '{revision}'")]
    FileNotFound { revision: String, path: String },

    #[error("Failed to materialize '{path}': {source}")]
    Materialize {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
