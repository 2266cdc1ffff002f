//! CLI command execution.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::{repl, runtime, server};

use super::args::{Cli, Commands};

/// Install the global tracing subscriber. `RUST_LOG` wins over `--log-level`.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Execute the CLI command.
pub async fn execute(cli: Cli) -> Result<()> {
    init_tracing(&cli.log_level);

    let config = Config::new(cli.response_delay_ms, &cli.reply_template)
        .context("Invalid configuration")?;
    let handle = runtime::spawn(&config);

    match cli.command {
        Commands::Serve { port } => server::start_server(port, handle).await,
        Commands::Repl => repl::run(handle).await,
    }
}
