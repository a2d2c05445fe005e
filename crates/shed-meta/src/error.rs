//! Error types for shed-meta

use std::path::PathBuf;

use shed_fs::constants::file_name_of;

/// Result type for shed-meta operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while parsing a single definition file.
///
/// Every variant renders as a message a repository owner can act on, since
/// the text ends up in the extraction result verbatim.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed XML: {message}")]
    Xml { message: String },

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing {element} '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    #[error("Missing <{element}> inside <{parent}>")]
    MissingElement { parent: String, element: String },

    #[error("Expected a <{expected}> document but found <{found}>")]
    UnexpectedRoot { expected: String, found: String },

    #[error("Unknown tool type '{name}'")]
    UnknownToolType { name: String },

    #[error("No such file or directory: '{path}'")]
    MissingFile { path: String },

    #[error("Included file '{href}' is outside the repository")]
    IncludeOutsideRepository { href: String },

    #[error("Include nesting too deep at '{href}'")]
    IncludeDepth { href: String },

    #[error("Not an exported workflow: {reason}")]
    NotAWorkflow { reason: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn missing_attribute(element: &str, attribute: &str) -> Self {
        Self::MissingAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        }
    }

    /// Instruction telling a repository owner how to fix this failure.
    pub fn correction_message(&self) -> String {
        match self {
            Self::MissingFile { path } => missing_file_correction(path),
            other => other.to_string(),
        }
    }
}

/// Correction for a reference to a file the repository does not contain.
///
/// Location files are never uploaded directly, so a missing `X.loc` asks for
/// `X.loc.sample` instead.
pub fn missing_file_correction(path: &str) -> String {
    let missing = file_name_of(path);
    let upload = if missing.ends_with(".loc") {
        format!("{missing}.sample")
    } else {
        missing.to_string()
    };
    format!(
        "This file refers to a missing file {missing}.  \
         Upload a file named {upload} to the repository to correct this error."
    )
}
