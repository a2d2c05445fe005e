//! Changeset descriptors.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Number of hex characters in the display form of a revision.
pub const SHORT_REVISION_LEN: usize = 12;

/// An immutable point in a repository's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Changeset {
    /// Position in history, counting from the root commit at zero
    pub ordinal: usize,

    /// Abbreviated revision string used as the metadata key
    pub revision: String,

    /// Full object id
    pub id: String,

    /// Commit author name
    pub author: String,

    /// First line of the commit message
    pub message: String,

    /// Commit timestamp
    pub timestamp: DateTime<Utc>,
}

impl Changeset {
    /// Whether `revision` names this changeset.
    ///
    /// Both the abbreviated and the full form are accepted.
    pub fn matches(&self, revision: &str) -> bool {
        !revision.is_empty() && (self.revision == revision || self.id == revision)
    }

    /// Human-readable `"<ordinal>:<revision>"` label.
    pub fn label(&self) -> String {
        format!("{}:{}", self.ordinal, self.revision)
    }
}

/// Abbreviate a full object id to its display form.
pub fn short_revision(id: &str) -> String {
    id.chars().take(SHORT_REVISION_LEN).collect()
}
