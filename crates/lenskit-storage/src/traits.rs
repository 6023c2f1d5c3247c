//! Record store trait definitions

use crate::error::StorageResult;
use async_trait::async_trait;
use lenskit_core::{PrimaryKey, Record, RecordType};

/// Trait for record store implementations
///
/// Lookups are read-only; the closure engine never writes through a store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Record Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Save a record, replacing any record with the same identity
    async fn save_record(&self, record: &Record) -> StorageResult<()>;

    /// Get a record by type and primary key
    async fn get_record(
        &self,
        record_type: &RecordType,
        pk: &PrimaryKey,
    ) -> StorageResult<Option<Record>>;

    /// Get all records of a type, in store order
    async fn get_all_records(&self, record_type: &RecordType) -> StorageResult<Vec<Record>>;

    /// Delete a record
    async fn delete_record(&self, record_type: &RecordType, pk: &PrimaryKey) -> StorageResult<()>;

    /// Total number of stored records
    async fn count(&self) -> StorageResult<usize>;

    // ─────────────────────────────────────────────────────────────────────────
    // Lookup Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Get records by key, in the order of `pks`; unknown keys are skipped
    async fn get_records(
        &self,
        record_type: &RecordType,
        pks: &[PrimaryKey],
    ) -> StorageResult<Vec<Record>> {
        let mut records = Vec::with_capacity(pks.len());
        for pk in pks {
            match self.get_record(record_type, pk).await? {
                Some(record) => records.push(record),
                None => tracing::debug!("No {} record with key {}", record_type, pk),
            }
        }
        Ok(records)
    }

    /// Get a record by a key typed by a user
    ///
    /// The input is parsed as an integer or UUID first; when that finds
    /// nothing the raw text is tried, so string keys such as `"42"` resolve.
    async fn find_record(
        &self,
        record_type: &RecordType,
        input: &str,
    ) -> StorageResult<Option<Record>> {
        let pk = PrimaryKey::parse(input);
        if let Some(record) = self.get_record(record_type, &pk).await? {
            return Ok(Some(record));
        }
        match pk {
            PrimaryKey::Text(_) => Ok(None),
            _ => {
                self.get_record(record_type, &PrimaryKey::Text(input.trim().to_string()))
                    .await
            }
        }
    }

    /// Records of `source` whose `field` holds `pk` (directly or in a key list)
    async fn get_referencing(
        &self,
        source: &RecordType,
        field: &str,
        pk: &PrimaryKey,
    ) -> StorageResult<Vec<Record>> {
        Ok(self
            .get_all_records(source)
            .await?
            .into_iter()
            .filter(|r| r.field(field).is_some_and(|v| pk.is_referenced_by(v)))
            .collect())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Bulk Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Save many records
    async fn save_records_batch(&self, records: &[Record]) -> StorageResult<()> {
        for record in records {
            self.save_record(record).await?;
        }
        Ok(())
    }
}
