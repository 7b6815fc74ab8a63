//! Command-line interface for the Corral test-environment provisioner.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use once_cell::sync::OnceCell;

use corral_core::config::CorralConfig;

mod commands;
mod output;

pub use commands::*;
pub use output::*;

const DEFAULT_CONFIG_FILE: &str = "corral.toml";

static LOGGING: OnceCell<()> = OnceCell::new();

fn init_logging(verbose: bool) {
    let _ = LOGGING.get_or_init(|| {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env().add_directive(
                    if verbose {
                        tracing::Level::DEBUG.into()
                    } else {
                        tracing::Level::INFO.into()
                    },
                ),
            )
            .with_target(false);

        let _ = builder.try_init();
    });
}

/// CLI arguments parser
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Provision a fresh test environment (quota, org, space)
    Create {
        /// Total-memory limit for the environment's quota
        #[arg(short, long, default_value = "10G")]
        quota_limit: String,

        /// Provision the persistent environment named in the config
        #[arg(short, long)]
        persistent: bool,
    },

    /// Tear a test environment down
    Destroy {
        /// Tear down the persistent environment named in the config
        #[arg(short, long)]
        persistent: bool,

        /// Organization name (required unless --persistent)
        #[arg(long)]
        org: Option<String>,

        /// Space name (required unless --persistent)
        #[arg(long)]
        space: Option<String>,

        /// Quota name (required unless --persistent)
        #[arg(long)]
        quota: Option<String>,

        /// The organization is owned elsewhere; only delete the space
        #[arg(long)]
        reuse_org: bool,

        /// Skip the confirmation for persistent environments
        #[arg(short, long)]
        force: bool,
    },
}

/// Parse arguments and dispatch to the selected command
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Create {
            quota_limit,
            persistent,
        } => commands::execute_create(quota_limit, persistent, &config).await,
        Commands::Destroy {
            persistent,
            org,
            space,
            quota,
            reuse_org,
            force,
        } => {
            commands::execute_destroy(persistent, org, space, quota, reuse_org, force, &config)
                .await
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<CorralConfig> {
    let config = match path {
        Some(path) => CorralConfig::from_file(path)?,
        None => {
            let default = std::path::Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                CorralConfig::from_file(default)?
            } else {
                CorralConfig::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}
