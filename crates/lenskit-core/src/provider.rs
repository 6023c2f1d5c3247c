//! Relation enumeration trait

use crate::error::Result;
use crate::record::Record;
use async_trait::async_trait;

/// Source of the records directly related to a record
///
/// Implementations must be read-only and deterministic: the same record must
/// yield the same ordered list every time, since both the closure build and
/// the overflow probe depend on that order. A missing related record is
/// omitted from the list, never reported as an error.
#[async_trait]
pub trait RelationProvider: Send + Sync {
    /// Records related to `record`, in schema declaration order
    ///
    /// Reverse relations are only followed when `include_reverse` is set.
    async fn related_of(&self, record: &Record, include_reverse: bool) -> Result<Vec<Record>>;
}

#[async_trait]
impl<P: RelationProvider + ?Sized> RelationProvider for std::sync::Arc<P> {
    async fn related_of(&self, record: &Record, include_reverse: bool) -> Result<Vec<Record>> {
        (**self).related_of(record, include_reverse).await
    }
}
