//! Snapshot export command

use std::path::{Path, PathBuf};
use std::time::Duration;

#[cfg(unix)]
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use clap::Args;

use crate::{AppContext, Cli};
use lenskit_core::{
    export_records, ExportOptions, JsonSnapshot, RecordType, SnapshotSerializer,
};
use lenskit_storage::RecordStore;

#[derive(Args)]
pub struct ExportArgs {
    /// Record type of the seeds, as app.model
    #[arg(short, long)]
    pub model: String,

    /// Primary keys of the seed records (comma-separated); a numeric key
    /// that matches no record is retried as a string key
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub pks: Vec<String>,

    /// Also follow reverse relations
    #[arg(short, long)]
    pub reverse: bool,

    /// Object limit for this export (default: from config)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: Option<u64>,

    /// Pretty-print the snapshot
    #[arg(long)]
    pub pretty: bool,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Give up after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Seed keys from the command line, trimmed and with blanks dropped
pub fn parse_keys(raw: &[String]) -> anyhow::Result<Vec<&str>> {
    let keys: Vec<&str> = raw
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if keys.is_empty() {
        anyhow::bail!("No primary keys given");
    }
    Ok(keys)
}

pub async fn run(args: &ExportArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let record_type = RecordType::parse(&args.model)?;
    if !ctx.provider.schema().contains(&record_type) {
        anyhow::bail!("Model '{}' is not declared in the schema", record_type);
    }
    let keys = parse_keys(&args.pks)?;

    let store = ctx.provider.store();
    let mut seeds = Vec::with_capacity(keys.len());
    for key in &keys {
        match store.find_record(&record_type, key).await? {
            Some(record) => seeds.push(record),
            None => tracing::debug!("No {} record with key {}", record_type, key),
        }
    }
    if seeds.is_empty() {
        anyhow::bail!("No {} records match the given keys", record_type);
    }
    tracing::info!("Resolved {} of {} seed keys", seeds.len(), keys.len());

    let mut options = ExportOptions::new().include_reverse(args.reverse);
    if let Some(limit) = args.limit {
        options = options.with_limit(usize::try_from(limit)?);
    }

    let export = export_records(&ctx.provider, seeds, &options, &ctx.settings);
    let closure = match args.timeout {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), export)
            .await
            .map_err(|_| anyhow::anyhow!("Export timed out after {}s", secs))??,
        None => export.await?,
    };

    let serializer = JsonSnapshot {
        pretty: args.pretty,
    };
    let content = serializer.serialize(&closure.records)?;

    if let Some(ref path) = args.output {
        write_private(path, &content)?;
        if !cli.quiet {
            println!("Exported {} records to {:?}", closure.len(), path);
        }
    } else {
        println!("{}", content);
    }

    Ok(())
}

/// Write with owner-only permissions (0o600) where supported
fn write_private(path: &Path, content: &str) -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?;
        file.write_all(content.as_bytes())?;
    }
    #[cfg(not(unix))]
    {
        std::fs::write(path, content)?;
    }
    Ok(())
}
