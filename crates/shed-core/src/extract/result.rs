use serde::Serialize;
use shed_meta::{InvalidFile, MetadataDocument};

use super::ExtractionState;
use crate::RecordStrategy;

/// Two-valued status reported to callers.
///
/// `Error` covers both total failure and success with diagnostics; the
/// message tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Terminal state reached by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    PartialSuccess,
    Error,
}

impl From<Outcome> for ExtractionState {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => Self::Success,
            Outcome::PartialSuccess => Self::PartialSuccess,
            Outcome::Error => Self::Error,
        }
    }
}

/// What one extraction run did.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Empty on a clean success
    pub message: String,
    pub status: Status,
    pub outcome: Outcome,
    pub revision: String,
    pub invalid_files: Vec<InvalidFile>,
    /// How the document was persisted, if it was
    pub strategy: Option<RecordStrategy>,
    pub record_id: Option<u64>,
    /// Order-insensitive checksum of the persisted document
    pub document_checksum: Option<String>,
    #[serde(skip)]
    pub document: Option<MetadataDocument>,
}

impl ExtractionResult {
    pub(crate) fn error(revision: &str, message: String, invalid_files: Vec<InvalidFile>) -> Self {
        Self {
            message,
            status: Status::Error,
            outcome: Outcome::Error,
            revision: revision.to_string(),
            invalid_files,
            strategy: None,
            record_id: None,
            document_checksum: None,
            document: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

pub(crate) fn revision_not_found(revision: &str) -> String {
    format!("This repository does not include revision '{revision}'.")
}

pub(crate) fn not_installable(revision: &str) -> String {
    format!(
        "Revision '{revision}' includes no tools or workflows for which metadata can be defined; \
         it cannot be installed."
    )
}

pub(crate) fn never_defined(revision: &str) -> String {
    format!(
        "Metadata has never been defined for revision '{revision}', so it cannot be reset. \
         Metadata is first defined when a revision is the repository tip."
    )
}

/// Message listing every invalid file with its correction.
pub(crate) fn invalid_files_message(
    revision: &str,
    metadata_defined: bool,
    invalid_files: &[InvalidFile],
) -> String {
    let mut message = if metadata_defined {
        format!(
            "Metadata was defined for some items in revision '{revision}'.  \
             Correct the following problems if necessary and reset metadata.\n"
        )
    } else {
        format!(
            "Metadata cannot be defined for revision '{revision}' so this revision cannot be \
             automatically installed.  Correct the following problems and reset metadata.\n"
        )
    };
    for invalid in invalid_files {
        message.push_str(&invalid.to_string());
        message.push('\n');
    }
    message
}
