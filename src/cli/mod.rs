//! CLI command handling.
//!
//! Provides subcommands for:
//! - Sending requests through the token hooks (`send`)
//! - Inspecting and editing stored variables (`vars list`, `vars set`, ...)

mod send;
mod vars;

pub use send::{SendArgs, run_send_command};
pub use vars::{VarsCommand, run_vars_command};

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::config::{Config, parse_base_url};
use crate::variables::{FileStore, VariableStore, seed_from_dotenv};

#[derive(Parser, Debug)]
#[command(name = "bearer-hooks")]
#[command(about = "Send HTTP requests with a captured bearer token")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Variable file (overrides BEARER_HOOKS_VARS_PATH)
    #[arg(long = "vars", global = true)]
    pub vars_file: Option<PathBuf>,

    /// Dotenv file to seed variables from (repeatable, later files win)
    #[arg(long = "env", global = true)]
    pub env_files: Vec<PathBuf>,

    /// Base URL for relative request URLs (overrides BEARER_HOOKS_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a request with the bearer token attached
    Send(SendArgs),

    /// Manage stored variables
    #[command(subcommand)]
    Vars(VarsCommand),
}

impl Cli {
    /// Apply command-line overrides to the loaded config.
    pub fn apply_overrides(&self, config: &mut Config) -> anyhow::Result<()> {
        if let Some(path) = &self.vars_file {
            config.vars_path = path.clone();
        }
        if let Some(raw) = &self.base_url {
            config.client.base_url = Some(parse_base_url("--base-url", raw)?);
        }
        Ok(())
    }

    /// Open the variable file and apply any `--env` seed files on top.
    pub async fn open_store(&self, config: &Config) -> anyhow::Result<Arc<dyn VariableStore>> {
        let store = FileStore::open(&config.vars_path).await.map_err(|e| {
            anyhow::anyhow!(
                "Failed to open variables at {}: {}",
                config.vars_path.display(),
                e
            )
        })?;

        for path in &self.env_files {
            seed_from_dotenv(&store, path).await?;
        }
        Ok(Arc::new(store))
    }
}

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    cli.apply_overrides(&mut config)?;
    let store = cli.open_store(&config).await?;

    match cli.command {
        Command::Send(args) => run_send_command(args, &config, store).await,
        Command::Vars(cmd) => run_vars_command(cmd, &config, store.as_ref()).await,
    }
}
