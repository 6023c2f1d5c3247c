//! Lenskit CLI - Snapshot export of related records

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{completions, export, related};
use config::Config;
use lenskit_core::{LensSettings, Schema, SchemaDecl};
use lenskit_storage::{MemoryStore, StoreRelationProvider};

#[derive(Parser)]
#[command(name = "lenskit")]
#[command(author, version, about = "Export self-contained snapshots of related records")]
pub struct Cli {
    /// Config file (default: <config dir>/lenskit/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Fixture file holding the records
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    /// Schema file declaring the relations
    #[arg(short, long, global = true)]
    pub schema: Option<PathBuf>,

    /// Development mode; enables export unless configured otherwise
    #[arg(long, global = true, env = "LENSKIT_DEBUG")]
    pub debug: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export the closure of some records as a snapshot
    Export(export::ExportArgs),
    /// List the direct relations of one record
    Related(related::RelatedArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context with the loaded store and schema
pub struct AppContext {
    pub settings: LensSettings,
    pub provider: StoreRelationProvider<MemoryStore>,
}

impl AppContext {
    pub async fn new(cli: &Cli) -> anyhow::Result<Self> {
        let config = Config::load(cli.config.as_deref())?;

        let data_path = cli
            .data
            .clone()
            .or_else(|| config.data.clone())
            .context("No fixture data given. Pass --data or set `data` in the config")?;
        let schema_path = cli
            .schema
            .clone()
            .or_else(|| config.schema.clone())
            .context("No schema given. Pass --schema or set `schema` in the config")?;

        tracing::debug!("Using schema at: {:?}", schema_path);
        let content = tokio::fs::read_to_string(&schema_path)
            .await
            .with_context(|| format!("Failed to read schema {}", schema_path.display()))?;
        let decl: SchemaDecl = toml::from_str(&content)
            .with_context(|| format!("Invalid schema file {}", schema_path.display()))?;
        let schema = Schema::from_decl(&decl)?;

        tracing::debug!("Using fixture data at: {:?}", data_path);
        let store = MemoryStore::from_fixture_file(&data_path).await?;

        let mut settings = config.settings();
        settings.debug |= cli.debug;

        Ok(Self {
            settings,
            provider: StoreRelationProvider::new(Arc::new(schema), Arc::new(store)),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting lenskit CLI");

    match &cli.command {
        Commands::Export(args) => {
            let ctx = AppContext::new(&cli).await?;
            export::run(args, &cli, &ctx).await?
        }
        Commands::Related(args) => {
            let ctx = AppContext::new(&cli).await?;
            related::run(args, &cli, &ctx).await?
        }
        Commands::Config(args) => commands::config::run(args, &cli).await?,
        Commands::Completions(args) => completions::run(args)?,
    }

    Ok(())
}
