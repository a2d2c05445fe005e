use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shed_meta::MetadataDocument;

use crate::{Error, Result};

/// Metadata persisted for one repository revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Insertion order across the whole store
    pub id: u64,
    pub repository_id: String,
    pub changeset_revision: String,
    pub metadata: MetadataDocument,
    #[serde(default)]
    pub malicious: bool,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

/// In-memory table of records shared by the store implementations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordTable {
    /// Store format version
    version: String,
    next_id: u64,
    records: Vec<MetadataRecord>,
}

impl Default for RecordTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordTable {
    pub fn new() -> Self {
        Self {
            version: "1.0".to_string(),
            next_id: 1,
            records: Vec::new(),
        }
    }

    pub fn latest(&self, repository_id: &str) -> Option<&MetadataRecord> {
        self.records
            .iter()
            .filter(|r| r.repository_id == repository_id)
            .max_by_key(|r| r.id)
    }

    pub fn by_revision(&self, repository_id: &str, revision: &str) -> Option<&MetadataRecord> {
        self.records
            .iter()
            .find(|r| r.repository_id == repository_id && r.changeset_revision == revision)
    }

    pub fn create(
        &mut self,
        repository_id: &str,
        revision: &str,
        metadata: MetadataDocument,
    ) -> MetadataRecord {
        let now = Utc::now();
        let record = MetadataRecord {
            id: self.next_id,
            repository_id: repository_id.to_string(),
            changeset_revision: revision.to_string(),
            metadata,
            malicious: false,
            create_time: now,
            update_time: now,
        };
        self.next_id = record.id + 1;
        self.records.push(record.clone());
        record
    }

    pub fn update(
        &mut self,
        record: &MetadataRecord,
        revision: &str,
        metadata: MetadataDocument,
    ) -> Result<MetadataRecord> {
        let stored = self.find_mut(record)?;
        stored.changeset_revision = revision.to_string();
        stored.metadata = metadata;
        stored.update_time = Utc::now();
        Ok(stored.clone())
    }

    pub fn set_malicious(&mut self, record: &MetadataRecord, malicious: bool) -> Result<MetadataRecord> {
        let stored = self.find_mut(record)?;
        stored.malicious = malicious;
        stored.update_time = Utc::now();
        Ok(stored.clone())
    }

    pub fn list(&self, repository_id: &str) -> Vec<MetadataRecord> {
        let mut records: Vec<_> = self
            .records
            .iter()
            .filter(|r| r.repository_id == repository_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.id);
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn find_mut(&mut self, record: &MetadataRecord) -> Result<&mut MetadataRecord> {
        self.records
            .iter_mut()
            .find(|r| r.id == record.id && r.repository_id == record.repository_id)
            .ok_or_else(|| Error::RecordNotFound {
                repository: record.repository_id.clone(),
                id: record.id,
            })
    }
}
