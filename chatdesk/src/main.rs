//! Chatdesk - multi-session chat with a simulated responder.

use anyhow::Result;
use clap::Parser;

use chatdesk::cli::{execute, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    execute(cli).await
}
