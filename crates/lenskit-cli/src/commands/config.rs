//! Config command for managing CLI configuration

use clap::{Args, Subcommand};

use crate::config::Config;
use crate::Cli;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Get a config value
    Get {
        /// Config key name
        key: String,
    },
    /// Set a config value (an empty value unsets it)
    Set {
        /// Config key name
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
    /// Initialize default config file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

pub async fn run(args: &ConfigArgs, cli: &Cli) -> anyhow::Result<()> {
    let explicit = cli.config.as_deref();
    match &args.command {
        ConfigCommands::Get { key } => {
            let config = Config::load(explicit)?;
            match config.get(key)? {
                Some(value) => println!("{}", value),
                None => println!("(not set)"),
            }
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load(explicit)?;
            config.set(key, value)?;
            config.save()?;
            println!("Set {} = {}", key, value);
        }
        ConfigCommands::List => {
            let config = Config::load(explicit)?;
            println!("Config file: {}", config.path().display());
            println!();
            for key in Config::keys() {
                let value = config.get(key)?.unwrap_or_else(|| "(not set)".to_string());
                println!("{} = {}", key, value);
            }
        }
        ConfigCommands::Path => {
            println!("{}", crate::config::config_file_path(explicit).display());
        }
        ConfigCommands::Init { force } => {
            let path = crate::config::config_file_path(explicit);
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Config::new_at(path.clone()).save()?;
            println!("Created config file at {}", path.display());
        }
    }
    Ok(())
}
