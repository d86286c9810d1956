//! Tally Core Library
//!
//! Shared functionality for the Tally conversational expense tracker:
//! - SQLite storage for transactions, categories, budgets and settings
//! - Intent classification and entity extraction for chat messages
//! - Keyword + naive-bayes transaction categorization
//! - Pluggable remote generative-assistant backends (Gemini, mock)
//! - Conversational assistant with deterministic fallback
//! - Forecast, overspend-alert and recommendation engines

pub mod ai;
pub mod assistant;
pub mod categorize;
pub mod db;
pub mod error;
pub mod insights;
pub mod models;
pub mod nlu;

pub use ai::{GeminiBackend, MockBackend, RemoteBackend, RemoteClient};
pub use assistant::{Action, Assistant, Reply};
pub use categorize::{Categorizer, Classification, TrainingExample};
pub use db::Database;
pub use error::{Error, Result};
pub use insights::{
    Alert, AlertEngine, AlertKind, Confidence, Forecast, ForecastEngine, Priority,
    Recommendation, RecommendationEngine, Severity, Trend,
};
pub use models::{
    Budget, BudgetStatusItem, Category, CategoryBreakdownItem, MonthlyAggregate, Summary,
    Transaction, TransactionKind,
};
pub use nlu::{EntityExtractor, Intent, IntentClassifier, ParsedCommand};
