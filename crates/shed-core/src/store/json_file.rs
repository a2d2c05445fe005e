use std::fs::File;
use std::io::Read;

use fs2::FileExt;
use parking_lot::Mutex;
use shed_fs::NormalizedPath;
use shed_meta::MetadataDocument;
use tracing::debug;

use super::{MetadataRecord, MetadataStore, RecordTable};
use crate::{Error, Result};

/// Store persisted as a single JSON file.
///
/// Each write reloads the file, applies the change and replaces the file
/// atomically, so a crash leaves either the old or the new table on disk.
#[derive(Debug)]
pub struct JsonFileStore {
    path: NormalizedPath,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<NormalizedPath>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// Load the table with a shared lock; a missing file is an empty table.
    fn load(&self) -> Result<RecordTable> {
        if !self.path.is_file() {
            return Ok(RecordTable::new());
        }
        let native = self.path.to_native();
        let file = File::open(&native).map_err(|e| shed_fs::Error::io(&native, e))?;
        file.lock_shared()
            .map_err(|_| shed_fs::Error::LockFailed {
                path: native.clone(),
            })?;

        // Read through the locked handle
        let mut content = String::new();
        (&file)
            .read_to_string(&mut content)
            .map_err(|e| shed_fs::Error::io(&native, e))?;
        serde_json::from_str(&content).map_err(|e| Error::CorruptStore {
            path: native,
            message: e.to_string(),
        })
    }

    fn save(&self, table: &RecordTable) -> Result<()> {
        let content = serde_json::to_vec_pretty(table)?;
        shed_fs::io::write_atomic(&self.path, &content)?;
        debug!(path = %self.path, records = table.len(), "Saved metadata store");
        Ok(())
    }

    fn modify<T>(&self, f: impl FnOnce(&mut RecordTable) -> Result<T>) -> Result<T> {
        let _guard = self.write_lock.lock();
        let mut table = self.load()?;
        let value = f(&mut table)?;
        self.save(&table)?;
        Ok(value)
    }
}

impl MetadataStore for JsonFileStore {
    fn latest(&self, repository_id: &str) -> Result<Option<MetadataRecord>> {
        Ok(self.load()?.latest(repository_id).cloned())
    }

    fn by_revision(&self, repository_id: &str, revision: &str) -> Result<Option<MetadataRecord>> {
        Ok(self.load()?.by_revision(repository_id, revision).cloned())
    }

    fn create(
        &self,
        repository_id: &str,
        revision: &str,
        document: MetadataDocument,
    ) -> Result<MetadataRecord> {
        self.modify(|table| Ok(table.create(repository_id, revision, document)))
    }

    fn update(
        &self,
        record: &MetadataRecord,
        revision: &str,
        document: MetadataDocument,
    ) -> Result<MetadataRecord> {
        self.modify(|table| table.update(record, revision, document))
    }

    fn list(&self, repository_id: &str) -> Result<Vec<MetadataRecord>> {
        Ok(self.load()?.list(repository_id))
    }

    fn set_malicious(&self, record: &MetadataRecord, malicious: bool) -> Result<MetadataRecord> {
        self.modify(|table| table.set_malicious(record, malicious))
    }
}
