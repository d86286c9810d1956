//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `build_assistant` - Wire up storage, categorizer and assistant
//! - `cmd_init` - Initialize the database

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tally_core::{Assistant, Categorizer, Database, RemoteClient};

/// Open the database, running migrations and seeding defaults on first use
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path.to_string_lossy();
    Database::new(&path_str).context("Failed to open database")
}

/// Build the assistant over a database
///
/// Prefers the cached classifier model in the platform data directory and
/// falls back to an in-memory training run when the cache location is
/// unavailable. A GEMINI_API_KEY in the environment enables the remote
/// path for every user; otherwise the per-user stored credential applies.
pub fn build_assistant(db: &Database) -> Result<Assistant> {
    let categorizer = Categorizer::from_data_dir().or_else(|e| {
        tracing::warn!(error = %e, "Model cache unavailable, training in memory");
        Categorizer::new()
    })?;

    let assistant = Assistant::new(db.clone(), Arc::new(categorizer))
        .context("Failed to build assistant")?;

    Ok(match RemoteClient::from_env() {
        Some(client) => assistant.with_remote(client),
        None => assistant,
    })
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    let categories = db.get_categories(1, None).context("Failed to list categories")?;
    println!("   Seeded {} default categories", categories.len());

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Talk to the assistant: tally say spent 500 on groceries");
    println!("  2. Start a session:       tally chat");

    Ok(())
}
