//! Metadata extraction and versioning engine for tool shed repositories
//!
//! This crate coordinates the Layer 0 crates to answer one question per
//! repository revision: what can a consumer install from it?
//!
//! - **Validation**: dynamic tool parameters must be backed by sample files
//! - **Diff engine**: decides between a new metadata record and an in-place update
//! - **Metadata store**: durable, atomically written records per revision
//! - **Extractor**: the state machine that ties the above together
//!
//! # Architecture
//!
//! ```text
//!                 shed-cli
//!                    |
//!                shed-core
//!                    |
//!      +-------------+-------------+
//!      |             |             |
//!   shed-fs      shed-vcs      shed-meta
//! ```

pub mod codec;
pub mod config;
pub mod diff;
pub mod error;
pub mod extract;
pub mod locks;
pub mod store;
pub mod validation;

pub use codec::{AuthenticatedCodec, CodecError, Decoded};
pub use config::ShedConfig;
pub use diff::RecordStrategy;
pub use error::{Error, Result};
pub use extract::{ExtractionResult, ExtractionState, Extractor, Outcome, Repository, Status};
pub use locks::RepositoryLocks;
pub use store::{JsonFileStore, MemoryStore, MetadataRecord, MetadataStore};
pub use validation::{
    DynamicParameterValidator, SampleInstaller, ToolDataTableValidator, XmlToolDataTableValidator,
};
