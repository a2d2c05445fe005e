//! Durable metadata records, one per installable revision.
//!
//! The store is the only component that writes persisted metadata. Every
//! `create`/`update` is durable when it returns.

mod json_file;
mod memory;
mod record;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use record::{MetadataRecord, RecordTable};

use shed_meta::MetadataDocument;

use crate::Result;

/// Persistence contract for metadata records.
pub trait MetadataStore: Send + Sync {
    /// Most recently created record of the repository.
    fn latest(&self, repository_id: &str) -> Result<Option<MetadataRecord>>;

    /// Record created for exactly `revision`.
    fn by_revision(&self, repository_id: &str, revision: &str) -> Result<Option<MetadataRecord>>;

    fn create(
        &self,
        repository_id: &str,
        revision: &str,
        document: MetadataDocument,
    ) -> Result<MetadataRecord>;

    /// Replace the revision and document of an existing record.
    fn update(
        &self,
        record: &MetadataRecord,
        revision: &str,
        document: MetadataDocument,
    ) -> Result<MetadataRecord>;

    /// Every record of the repository in creation order.
    fn list(&self, repository_id: &str) -> Result<Vec<MetadataRecord>>;

    fn set_malicious(&self, record: &MetadataRecord, malicious: bool) -> Result<MetadataRecord>;
}
