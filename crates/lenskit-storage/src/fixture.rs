//! Fixture file loading
//!
//! A fixture is a JSON array of `{"model", "pk", "fields"}` entries, the
//! same shape a snapshot export produces.

use crate::error::{StorageError, StorageResult};
use crate::memory::MemoryStore;
use crate::traits::RecordStore;
use lenskit_core::Record;
use std::collections::HashSet;
use std::path::Path;

/// Parse fixture content, rejecting repeated identities
pub fn parse_fixture(content: &str) -> StorageResult<Vec<Record>> {
    let records: Vec<Record> = serde_json::from_str(content)?;

    let mut seen = HashSet::new();
    for record in &records {
        if !seen.insert(record.identity()) {
            return Err(StorageError::DuplicateRecord(record.identity().to_string()));
        }
    }
    Ok(records)
}

/// Save fixture records into a store, returning how many were imported
pub async fn import_fixture<S>(store: &S, records: &[Record]) -> StorageResult<usize>
where
    S: RecordStore + ?Sized,
{
    store.save_records_batch(records).await?;
    tracing::info!("Imported {} fixture records", records.len());
    Ok(records.len())
}

impl MemoryStore {
    /// Build a store from fixture content
    pub async fn from_fixture_str(content: &str) -> StorageResult<Self> {
        let store = Self::new();
        import_fixture(&store, &parse_fixture(content)?).await?;
        Ok(store)
    }

    /// Build a store from a fixture file
    pub async fn from_fixture_file(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading fixture from {:?}", path);
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_fixture_str(&content).await.map_err(|e| match e {
            StorageError::Serialization(inner) => {
                StorageError::InvalidFixture(format!("{}: {}", path.display(), inner))
            }
            other => other,
        })
    }
}
