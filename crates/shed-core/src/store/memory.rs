use parking_lot::RwLock;
use shed_meta::MetadataDocument;

use super::{MetadataRecord, MetadataStore, RecordTable};
use crate::Result;

/// Process-local store, for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: RwLock<RecordTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetadataStore for MemoryStore {
    fn latest(&self, repository_id: &str) -> Result<Option<MetadataRecord>> {
        Ok(self.table.read().latest(repository_id).cloned())
    }

    fn by_revision(&self, repository_id: &str, revision: &str) -> Result<Option<MetadataRecord>> {
        Ok(self.table.read().by_revision(repository_id, revision).cloned())
    }

    fn create(
        &self,
        repository_id: &str,
        revision: &str,
        document: MetadataDocument,
    ) -> Result<MetadataRecord> {
        Ok(self.table.write().create(repository_id, revision, document))
    }

    fn update(
        &self,
        record: &MetadataRecord,
        revision: &str,
        document: MetadataDocument,
    ) -> Result<MetadataRecord> {
        self.table.write().update(record, revision, document)
    }

    fn list(&self, repository_id: &str) -> Result<Vec<MetadataRecord>> {
        Ok(self.table.read().list(repository_id))
    }

    fn set_malicious(&self, record: &MetadataRecord, malicious: bool) -> Result<MetadataRecord> {
        self.table.write().set_malicious(record, malicious)
    }
}
