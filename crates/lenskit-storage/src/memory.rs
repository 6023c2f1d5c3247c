//! In-memory record store

use crate::error::{StorageError, StorageResult};
use crate::traits::RecordStore;
use async_trait::async_trait;
use lenskit_core::{PrimaryKey, Record, RecordType};
use std::collections::HashMap;
use std::sync::RwLock;

/// Records of one type, in insertion order
#[derive(Default)]
struct Table {
    rows: Vec<Record>,
    index: HashMap<PrimaryKey, usize>,
}

impl Table {
    fn reindex(&mut self) {
        self.index = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| (r.pk.clone(), i))
            .collect();
    }
}

/// In-memory record store
///
/// Store order is insertion order per record type.
pub struct MemoryStore {
    tables: RwLock<HashMap<RecordType, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Database(format!("Lock error: {}", e))
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn save_record(&self, record: &Record) -> StorageResult<()> {
        let mut tables = self.tables.write().map_err(lock_error)?;
        let table = tables.entry(record.record_type.clone()).or_default();
        match table.index.get(&record.pk) {
            Some(&i) => table.rows[i] = record.clone(),
            None => {
                table.index.insert(record.pk.clone(), table.rows.len());
                table.rows.push(record.clone());
            }
        }
        Ok(())
    }

    async fn get_record(
        &self,
        record_type: &RecordType,
        pk: &PrimaryKey,
    ) -> StorageResult<Option<Record>> {
        let tables = self.tables.read().map_err(lock_error)?;
        Ok(tables
            .get(record_type)
            .and_then(|t| t.index.get(pk).map(|&i| t.rows[i].clone())))
    }

    async fn get_all_records(&self, record_type: &RecordType) -> StorageResult<Vec<Record>> {
        let tables = self.tables.read().map_err(lock_error)?;
        Ok(tables
            .get(record_type)
            .map(|t| t.rows.clone())
            .unwrap_or_default())
    }

    async fn delete_record(&self, record_type: &RecordType, pk: &PrimaryKey) -> StorageResult<()> {
        let mut tables = self.tables.write().map_err(lock_error)?;
        if let Some(table) = tables.get_mut(record_type) {
            if let Some(i) = table.index.get(pk).copied() {
                table.rows.remove(i);
                table.reindex();
            }
        }
        Ok(())
    }

    async fn count(&self) -> StorageResult<usize> {
        let tables = self.tables.read().map_err(lock_error)?;
        Ok(tables.values().map(|t| t.rows.len()).sum())
    }

    async fn get_referencing(
        &self,
        source: &RecordType,
        field: &str,
        pk: &PrimaryKey,
    ) -> StorageResult<Vec<Record>> {
        let tables = self.tables.read().map_err(lock_error)?;
        Ok(tables
            .get(source)
            .map(|t| {
                t.rows
                    .iter()
                    .filter(|r| r.field(field).is_some_and(|v| pk.is_referenced_by(v)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
