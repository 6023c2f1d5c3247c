//! Snapshot export entry points

use crate::closure::{Closure, ClosureBuilder, ClosureRequest};
use crate::config::LensSettings;
use crate::error::{Error, Result};
use crate::provider::RelationProvider;
use crate::record::Record;
use crate::snapshot::SnapshotSerializer;

/// Per-export options chosen by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub include_reverse: bool,

    /// Overrides the configured default object limit
    pub object_limit: Option<usize>,
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_reverse(mut self, include_reverse: bool) -> Self {
        self.include_reverse = include_reverse;
        self
    }

    pub fn with_limit(mut self, object_limit: usize) -> Self {
        self.object_limit = Some(object_limit);
        self
    }
}

/// Compute the closure of `seeds` under the given settings
pub async fn export_records<P>(
    provider: &P,
    seeds: Vec<Record>,
    options: &ExportOptions,
    settings: &LensSettings,
) -> Result<Closure>
where
    P: RelationProvider + ?Sized,
{
    if !settings.fixtures_enabled() {
        return Err(Error::ExportDisabled);
    }

    let object_limit = options.object_limit.unwrap_or_else(|| settings.object_limit());
    tracing::info!(
        "Exporting closure of {} seed records (limit: {}, reverse: {})",
        seeds.len(),
        object_limit,
        options.include_reverse
    );

    let request = ClosureRequest::new(seeds)
        .include_reverse(options.include_reverse)
        .with_limit(object_limit);

    ClosureBuilder::new(provider)
        .with_probe_limit(settings.probe_limit())
        .build(request)
        .await
}

/// Compute the closure of `seeds` and render it
pub async fn export_snapshot<P, S>(
    provider: &P,
    seeds: Vec<Record>,
    options: &ExportOptions,
    settings: &LensSettings,
    serializer: &S,
) -> Result<String>
where
    P: RelationProvider + ?Sized,
    S: SnapshotSerializer + ?Sized,
{
    let closure = export_records(provider, seeds, options, settings).await?;
    serializer.serialize(&closure.records)
}
