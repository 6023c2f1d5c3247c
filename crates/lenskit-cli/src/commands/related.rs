//! Direct relations of a single record

use clap::Args;

use crate::output::{format_records, OutputFormat};
use crate::{AppContext, Cli};
use lenskit_core::{RecordType, RelationProvider};
use lenskit_storage::RecordStore;

#[derive(Args)]
pub struct RelatedArgs {
    /// Record type, as app.model
    #[arg(short, long)]
    pub model: String,

    /// Primary key of the record
    #[arg(short, long)]
    pub pk: String,

    /// Include reverse relations
    #[arg(short, long)]
    pub reverse: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

pub async fn run(args: &RelatedArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let record_type = RecordType::parse(&args.model)?;
    let record = match ctx.provider.store().find_record(&record_type, &args.pk).await? {
        Some(record) => record,
        None => anyhow::bail!("No {} record with key {}", record_type, args.pk.trim()),
    };

    let related = ctx.provider.related_of(&record, args.reverse).await?;

    if args.format == OutputFormat::Table && !cli.quiet {
        println!("Relations of {} ({} found):", record.identity(), related.len());
    }
    if related.is_empty() && args.format == OutputFormat::Table {
        println!("  (no related records)");
        return Ok(());
    }
    println!("{}", format_records(&related, args.format)?);

    Ok(())
}
