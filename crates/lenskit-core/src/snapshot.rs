//! Snapshot rendering

use crate::error::Result;
use crate::record::Record;

/// Renders an ordered record list to a wire format
pub trait SnapshotSerializer {
    fn serialize(&self, records: &[Record]) -> Result<String>;
}

/// JSON array of `{"model", "pk", "fields"}` entries
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSnapshot {
    pub pretty: bool,
}

impl JsonSnapshot {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl SnapshotSerializer for JsonSnapshot {
    fn serialize(&self, records: &[Record]) -> Result<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(records)?
        } else {
            serde_json::to_string(records)?
        };
        Ok(rendered)
    }
}
