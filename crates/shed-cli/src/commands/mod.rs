//! Command implementations

mod codec;
mod metadata;
mod revisions;

pub use codec::{run_decode, run_encode};
pub use metadata::{run_set_metadata, run_show};
pub use revisions::run_revisions;
