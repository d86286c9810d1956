//! Category lookups and default seeding

use rusqlite::{params, OptionalExtension, Row};

use super::Database;
use crate::error::Result;
use crate::models::{Category, TransactionKind};

/// Default category set, seeded once with NULL user_id so every user sees it
const DEFAULT_CATEGORIES: &[(&str, &str, &str, &str)] = &[
    ("Food & Dining", "expense", "🍔", "#FF6B6B"),
    ("Transport", "expense", "🚗", "#4ECDC4"),
    ("Entertainment", "expense", "🎬", "#45B7D1"),
    ("Utilities", "expense", "💡", "#96CEB4"),
    ("Shopping", "expense", "🛍️", "#FFEAA7"),
    ("Healthcare", "expense", "🏥", "#DDA0DD"),
    ("Education", "expense", "📚", "#98D8C8"),
    ("Savings", "expense", "💰", "#F7DC6F"),
    ("Other", "expense", "📦", "#BDC3C7"),
    ("Salary", "income", "💵", "#2ECC71"),
    ("Freelance", "income", "💻", "#3498DB"),
    ("Investment", "income", "📈", "#9B59B6"),
    ("Gift", "income", "🎁", "#E74C3C"),
    ("Other Income", "income", "💸", "#1ABC9C"),
];

fn map_category(row: &Row<'_>) -> rusqlite::Result<Category> {
    let kind: String = row.get(2)?;
    let kind = kind.parse::<TransactionKind>().map_err(|_| {
        rusqlite::Error::InvalidColumnType(2, "kind".into(), rusqlite::types::Type::Text)
    })?;
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        kind,
        icon: row.get(3)?,
        color: row.get(4)?,
        user_id: row.get(5)?,
    })
}

impl Database {
    /// Seed the default categories if none exist yet (idempotent)
    pub fn seed_default_categories(&self) -> Result<()> {
        let conn = self.conn()?;

        let existing: i64 = conn.query_row(
            "SELECT COUNT(*) FROM categories WHERE user_id IS NULL",
            [],
            |row| row.get(0),
        )?;
        if existing > 0 {
            return Ok(());
        }

        for (name, kind, icon, color) in DEFAULT_CATEGORIES {
            conn.execute(
                "INSERT INTO categories (name, kind, icon, color, user_id) VALUES (?, ?, ?, ?, NULL)",
                params![name, kind, icon, color],
            )?;
        }

        tracing::info!(count = DEFAULT_CATEGORIES.len(), "Seeded default categories");
        Ok(())
    }

    /// List categories visible to a user (their own plus the shared defaults),
    /// optionally filtered by kind, ordered by kind then name
    pub fn get_categories(
        &self,
        user_id: i64,
        kind: Option<TransactionKind>,
    ) -> Result<Vec<Category>> {
        let conn = self.conn()?;

        let mut sql = String::from(
            "SELECT id, name, kind, icon, color, user_id FROM categories
             WHERE (user_id = ? OR user_id IS NULL)",
        );
        let mut query_params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

        if let Some(k) = kind {
            sql.push_str(" AND kind = ?");
            query_params.push(Box::new(k.as_str()));
        }
        sql.push_str(" ORDER BY kind, name");

        let param_refs: Vec<&dyn rusqlite::ToSql> =
            query_params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(param_refs.as_slice(), map_category)?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Look up a category by exact name for a user (shared defaults included)
    pub fn get_category_by_name(&self, name: &str, user_id: i64) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let category = conn
            .query_row(
                "SELECT id, name, kind, icon, color, user_id FROM categories
                 WHERE name = ? AND (user_id = ? OR user_id IS NULL)",
                params![name, user_id],
                map_category,
            )
            .optional()?;
        Ok(category)
    }

    /// Create a user-owned category, returning its id
    pub fn add_category(
        &self,
        name: &str,
        kind: TransactionKind,
        icon: &str,
        color: &str,
        user_id: i64,
    ) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO categories (name, kind, icon, color, user_id) VALUES (?, ?, ?, ?, ?)",
            params![name, kind.as_str(), icon, color, user_id],
        )?;
        Ok(conn.last_insert_rowid())
    }
}
