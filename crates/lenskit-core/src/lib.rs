//! Lenskit Core - Relational closure engine for snapshot export
//!
//! This crate provides the record model, the relation schema, and the
//! bounded closure and excess probe algorithms used to export a
//! self-contained snapshot of related records.

pub mod closure;
pub mod config;
pub mod error;
pub mod export;
pub mod probe;
pub mod provider;
pub mod record;
pub mod schema;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod testing;

pub use closure::{Closure, ClosureBuilder, ClosureRequest, ClosureStats};
pub use config::{FixtureSettings, LensSettings, DEFAULT_OBJECT_LIMIT, DEFAULT_PROBE_LIMIT};
pub use error::{Error, OverflowDiagnostic, Result};
pub use export::{export_records, export_snapshot, ExportOptions};
pub use probe::{ExcessProber, ProbeOutcome};
pub use provider::RelationProvider;
pub use record::{NodeIdentity, PrimaryKey, Record, RecordType};
pub use schema::{LinkDecl, LinkKind, ModelDecl, RelationField, RelationKind, Schema, SchemaDecl};
pub use snapshot::{JsonSnapshot, SnapshotSerializer};
