//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::simulator::DEFAULT_REPLY_TEMPLATE;

/// Chatdesk - multi-session chat with a simulated responder
#[derive(Parser, Debug)]
#[command(name = "chatdesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Delay before a simulated reply is delivered, in milliseconds
    #[arg(
        long,
        global = true,
        env = "CHATDESK_RESPONSE_DELAY_MS",
        default_value_t = 3000
    )]
    pub response_delay_ms: u64,

    /// Reply format; `{input}` is replaced with the user's message
    #[arg(
        long,
        global = true,
        env = "CHATDESK_REPLY_TEMPLATE",
        default_value = DEFAULT_REPLY_TEMPLATE
    )]
    pub reply_template: String,

    /// Log filter used when RUST_LOG is not set (e.g. info, debug)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the HTTP/WebSocket adapter
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "58231")]
        port: u16,
    },

    /// Chat interactively in the terminal
    Repl,
}
