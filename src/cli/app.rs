//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{import_cmd, plugin_cmd, prices_cmd};
use crate::storage::Config;

#[derive(Parser)]
#[command(name = "tradeplug")]
#[command(author, version, about = "Plugin-driven price imports")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true, env = "TRADEPLUG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the price catalog and import files
    #[arg(long, global = true, env = "TRADEPLUG_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import a .prices file, optionally through a plugin
    Import {
        /// File to import (defaults to import.prices in the data directory)
        file: Option<PathBuf>,

        /// Import plugin to use
        #[arg(long, short = 'P')]
        plugin: Option<String>,

        /// Plugin option as key or key=value; repeatable, use --opt=help for details
        #[arg(long = "opt", short = 'O', value_name = "OPT")]
        options: Vec<String>,

        /// Suppress informational plugin output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Inspect available plugins
    #[command(subcommand)]
    Plugin(plugin_cmd::PluginCommands),

    /// Show prices held in the catalog
    Prices {
        /// Only show this station
        #[arg(long)]
        station: Option<String>,
    },
}

/// Installs the stderr log subscriber
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed when run from tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = Output::new(cli.format);
    let config = Config::load(cli.config.as_deref())?;
    let data_dir = config.data_dir(cli.data_dir.as_deref());
    debug!(data_dir = %data_dir.display(), "tradeplug starting");

    match cli.command {
        Commands::Import {
            file,
            plugin,
            options,
            quiet,
        } => import_cmd::run(
            &output,
            &config,
            data_dir,
            import_cmd::ImportArgs {
                file,
                plugin,
                options,
                quiet,
            },
        )?,
        Commands::Plugin(cmd) => plugin_cmd::run(cmd, &output)?,
        Commands::Prices { station } => {
            prices_cmd::run(&output, &config, &data_dir, station.as_deref())?
        }
    }

    Ok(())
}
