//! bx - Box command-line client
//!
//! Keeps the OAuth2 tokens in `~/.config/bx/bx.toml` alive: every run
//! refreshes the short-lived access token and writes the rotated pair back
//! to the config file.

mod auth;
mod cli;
mod client;
mod config;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::settings::env;
use crate::error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(env::LOG_LEVEL).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Every error is fatal; this is the only place the process exits
    if let Err(e) = run(cli).await {
        eprintln!("{}", e.fatal_report());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    cli::commands::handle_check(cli.config).await
}
