//! Revision access for tool shed repositories
//!
//! Abstracts "list changesets", "fetch file content at a changeset" and
//! "identify the tip" over the version-control backend, so metadata
//! extraction never depends on a particular VCS.

pub mod changeset;
pub mod error;
pub mod git;
pub mod materialize;
pub mod source;

pub use changeset::{Changeset, SHORT_REVISION_LEN};
pub use error::{Error, Result};
pub use git::GitRevisionSource;
pub use materialize::MaterializedFile;
pub use source::{ResolvedRevision, RevisionSource};
