//! Tally CLI - Conversational expense tracker
//!
//! Usage:
//!   tally init                  Initialize database
//!   tally chat                  Interactive assistant session
//!   tally say spent 500 on tea  One-shot message
//!   tally forecast              Next-month prediction
//!   tally alerts                Overspend alerts
//!   tally status                Summary + quick insights

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Chat => commands::cmd_chat(&cli.db, cli.user).await,
        Commands::Say { message, json } => {
            commands::cmd_say(&cli.db, cli.user, &message.join(" "), json).await
        }
        Commands::Forecast => commands::cmd_forecast(&cli.db, cli.user),
        Commands::Alerts => commands::cmd_alerts(&cli.db, cli.user),
        Commands::Recommend => commands::cmd_recommend(&cli.db, cli.user),
        Commands::Recent { limit } => commands::cmd_recent(&cli.db, cli.user, limit),
        Commands::Status => commands::cmd_status(&cli.db, cli.user),
    }
}
