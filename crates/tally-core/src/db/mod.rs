//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `categories` - Category lookups and default seeding
//! - `transactions` - Transaction CRUD and period summaries
//! - `budgets` - Budget limits and budget-vs-actual status
//! - `reports` - Category breakdowns and monthly trend aggregates
//! - `settings` - Per-user key/value settings (remote assistant key, etc.)

use chrono::NaiveDate;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::Result;

mod budgets;
mod categories;
mod reports;
mod settings;
mod transactions;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Parse a stored "YYYY-MM-DD" date column
pub(crate) fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .unwrap_or_else(|_| chrono::Local::now().date_naive())
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Create a new database connection pool
    ///
    /// Runs migrations and seeds the default category set on first use.
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;
        db.seed_default_categories()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Note: Uses a temporary file rather than `:memory:` because each
    /// pooled connection would otherwise open its own private memory db.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = format!(
            "{}/tally_test_{}_{}.db",
            std::env::temp_dir().display(),
            std::process::id(),
            id
        );

        let _ = std::fs::remove_file(&path);

        Self::new(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            -- WAL mode: readers don't block the single writer
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            -- Categories (defaults carry NULL user_id and are shared)
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                kind TEXT NOT NULL,
                icon TEXT NOT NULL DEFAULT '📦',
                color TEXT NOT NULL DEFAULT '#BDC3C7',
                user_id INTEGER,
                UNIQUE(name, user_id)
            );

            -- Transactions
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                amount REAL NOT NULL,
                description TEXT,
                category_id INTEGER REFERENCES categories(id),
                kind TEXT NOT NULL,
                date DATE NOT NULL,
                user_id INTEGER NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_user_date
                ON transactions(user_id, date);
            CREATE INDEX IF NOT EXISTS idx_transactions_category
                ON transactions(category_id);

            -- Monthly budget limits, one row per (category, user)
            CREATE TABLE IF NOT EXISTS budgets (
                id INTEGER PRIMARY KEY,
                category_id INTEGER NOT NULL REFERENCES categories(id),
                user_id INTEGER NOT NULL,
                monthly_limit REAL NOT NULL,
                UNIQUE(category_id, user_id)
            );

            -- Per-user settings
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                PRIMARY KEY (key, user_id)
            );
            "#,
        )?;

        info!(path = %self.db_path, "Database migrations complete");
        Ok(())
    }

    /// Clear all transactional data for a user (keeps categories/settings)
    pub fn clear_all_data(&self, user_id: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM transactions WHERE user_id = ?",
            rusqlite::params![user_id],
        )?;
        conn.execute(
            "DELETE FROM budgets WHERE user_id = ?",
            rusqlite::params![user_id],
        )?;
        info!(user_id, "Cleared all transaction data");
        Ok(())
    }
}
