//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Conversational expense tracker
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Track expenses by talking to your terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// Acting user id
    #[arg(short, long, default_value_t = 1, global = true)]
    pub user: i64,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Interactive chat session with the assistant
    Chat,

    /// Send a single message to the assistant
    Say {
        /// The message, e.g. "spent 500 on groceries"
        message: Vec<String>,

        /// Print the reply as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Predict next month's income and expenses
    Forecast,

    /// Detect budget breaches and unusual spending
    Alerts,

    /// Personalized financial recommendations
    Recommend,

    /// List the most recent transactions
    Recent {
        /// How many transactions to show
        #[arg(short, long, default_value_t = 5)]
        limit: i64,
    },

    /// Current-month summary and quick insights
    Status,
}
