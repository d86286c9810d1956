//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (open_db, build_assistant) and `init`
//! - `chat` - Interactive chat session and one-shot messages
//! - `insights` - Forecast, alert and recommendation commands
//! - `status` - Recent transactions and the status dashboard line

pub mod chat;
pub mod core;
pub mod insights;
pub mod status;

// Re-export command functions for main.rs
pub use chat::*;
pub use core::*;
pub use insights::*;
pub use status::*;
