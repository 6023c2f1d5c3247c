//! Schema-driven relation provider over a record store

use crate::traits::RecordStore;
use async_trait::async_trait;
use futures::future::try_join_all;
use lenskit_core::{
    Error, PrimaryKey, Record, RelationField, RelationKind, RelationProvider, Result, Schema,
};
use serde_json::Value;
use std::sync::Arc;

/// Resolves the relations a [`Schema`] declares against a [`RecordStore`]
///
/// Single-valued link fields hold a key or `null`; many-to-many fields hold
/// an array of keys. A key whose record no longer exists yields nothing.
pub struct StoreRelationProvider<S: ?Sized> {
    schema: Arc<Schema>,
    store: Arc<S>,
}

impl<S: RecordStore + ?Sized> StoreRelationProvider<S> {
    pub fn new(schema: Arc<Schema>, store: Arc<S>) -> Self {
        Self { schema, store }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn forward_single(&self, record: &Record, field: &RelationField) -> Result<Option<Record>> {
        let Some(value) = record.field(&field.name) else {
            return Ok(None);
        };
        let Some(pk) = link_key(record, field, value)? else {
            return Ok(None);
        };

        let target = self.store.get_record(&field.target, &pk).await?;
        if target.is_none() {
            tracing::trace!(
                "{}.{} points at missing {} record {}",
                record.identity(),
                field.name,
                field.target,
                pk
            );
        }
        Ok(target)
    }

    async fn forward_multi(&self, record: &Record, field: &RelationField) -> Result<Vec<Record>> {
        let keys = match record.field(&field.name) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    link_key(record, field, item)?.ok_or_else(|| {
                        Error::Integrity(format!(
                            "{}.{} contains a null key",
                            record.identity(),
                            field.name
                        ))
                    })
                })
                .collect::<Result<Vec<PrimaryKey>>>()?,
            Some(other) => {
                return Err(Error::Integrity(format!(
                    "{}.{} must hold a list of keys, found {}",
                    record.identity(),
                    field.name,
                    other
                )))
            }
        };

        let lookups = keys
            .iter()
            .map(|pk| self.store.get_record(&field.target, pk));
        let targets = try_join_all(lookups).await?;

        Ok(targets.into_iter().flatten().collect())
    }

    async fn reverse(&self, record: &Record, field: &RelationField) -> Result<Vec<Record>> {
        let via = field.via.as_deref().ok_or_else(|| {
            Error::Configuration(format!(
                "reverse field {}.{} has no forward link",
                record.record_type, field.name
            ))
        })?;
        Ok(self
            .store
            .get_referencing(&field.target, via, &record.pk)
            .await?)
    }
}

/// Key held by a link field value, with the offending field named on error
fn link_key(record: &Record, field: &RelationField, value: &Value) -> Result<Option<PrimaryKey>> {
    PrimaryKey::from_json(value).map_err(|e| {
        Error::Integrity(format!("{}.{}: {}", record.identity(), field.name, e))
    })
}

#[async_trait]
impl<S: RecordStore + ?Sized> RelationProvider for StoreRelationProvider<S> {
    async fn related_of(&self, record: &Record, include_reverse: bool) -> Result<Vec<Record>> {
        let fields = self
            .schema
            .relations_of(&record.record_type)
            .ok_or_else(|| Error::UnknownRecordType(record.record_type.to_string()))?;

        let mut related = Vec::new();
        for field in fields {
            if field.kind.is_reverse() && !include_reverse {
                continue;
            }
            match field.kind {
                RelationKind::ForwardSingle => {
                    related.extend(self.forward_single(record, field).await?);
                }
                RelationKind::ForwardMulti => {
                    related.extend(self.forward_multi(record, field).await?);
                }
                RelationKind::ReverseSingle => {
                    let mut found = self.reverse(record, field).await?;
                    if found.len() > 1 {
                        return Err(Error::Integrity(format!(
                            "{} has {} records on one-to-one relation {}",
                            record.identity(),
                            found.len(),
                            field.name
                        )));
                    }
                    related.extend(found.pop());
                }
                RelationKind::ReverseMulti => {
                    related.extend(self.reverse(record, field).await?);
                }
            }
        }
        Ok(related)
    }
}
