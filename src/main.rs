use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use bearer_hooks::cli::{Cli, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so response bodies on stdout stay pipeable.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bearer_hooks=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    run(cli).await
}
