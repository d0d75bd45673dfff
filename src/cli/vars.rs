//! `vars` commands: inspect and edit stored variables.

use clap::Subcommand;

use crate::config::Config;
use crate::variables::VariableStore;

#[derive(Subcommand, Debug, Clone)]
pub enum VarsCommand {
    /// List all variables
    List,

    /// Print one variable
    Get {
        /// Variable name (e.g., "auth_token")
        name: String,
    },

    /// Set a variable (empty value if omitted)
    Set {
        /// Variable name
        name: String,
        /// Value to set
        value: Option<String>,
    },

    /// Remove a variable
    Unset {
        /// Variable name
        name: String,
    },

    /// Show where variables are stored
    Path,
}

pub async fn run_vars_command(
    cmd: VarsCommand,
    config: &Config,
    store: &dyn VariableStore,
) -> anyhow::Result<()> {
    match cmd {
        VarsCommand::List => {
            let all = store.list().await?;
            if all.is_empty() {
                println!("(No variables set)");
            }
            for (name, value) in all {
                println!("{name}={value}");
            }
        }
        VarsCommand::Get { name } => match store.get(&name).await? {
            Some(value) => println!("{value}"),
            None => anyhow::bail!("Variable '{}' is not set", name),
        },
        VarsCommand::Set { name, value } => {
            store.set(&name, value.as_deref().unwrap_or_default()).await?;
            println!("Variable '{}' set.", name);
        }
        VarsCommand::Unset { name } => {
            if store.remove(&name).await? {
                println!("Variable '{}' removed.", name);
            } else {
                println!("Variable '{}' was not set.", name);
            }
        }
        VarsCommand::Path => {
            println!("{}", config.vars_path.display());
        }
    }

    Ok(())
}
