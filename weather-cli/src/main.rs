//! Binary crate for the `weather-cards` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive form entry and confirmation prompts
//! - Terminal and HTML output of the card board

use clap::Parser;

mod cli;
mod form;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cmd = cli::Cli::parse();
    cmd.run().await
}

/// Logs go to stderr so rendered boards on stdout stay clean.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
