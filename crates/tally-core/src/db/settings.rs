//! Per-user key/value settings

use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::Result;

impl Database {
    /// Get a setting value for a user
    pub fn get_setting(&self, key: &str, user_id: i64) -> Result<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ? AND user_id = ?",
                params![key, user_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Get a setting value for a user, falling back to a default
    pub fn get_setting_or(&self, key: &str, user_id: i64, default: &str) -> Result<String> {
        Ok(self
            .get_setting(key, user_id)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Set or replace a setting value for a user (upsert)
    pub fn set_setting(&self, key: &str, value: &str, user_id: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO settings (key, value, user_id)
             VALUES (?, ?, ?)
             ON CONFLICT(key, user_id) DO UPDATE SET value = excluded.value",
            params![key, value, user_id],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_round_trip() {
        let db = Database::in_memory().unwrap();

        assert!(db.get_setting("gemini_api_key", 1).unwrap().is_none());
        assert_eq!(db.get_setting_or("currency", 1, "₹").unwrap(), "₹");

        db.set_setting("gemini_api_key", "abc123", 1).unwrap();
        assert_eq!(
            db.get_setting("gemini_api_key", 1).unwrap().as_deref(),
            Some("abc123")
        );

        // Upsert replaces, scoped per user
        db.set_setting("gemini_api_key", "xyz789", 1).unwrap();
        assert_eq!(
            db.get_setting("gemini_api_key", 1).unwrap().as_deref(),
            Some("xyz789")
        );
        assert!(db.get_setting("gemini_api_key", 2).unwrap().is_none());
    }
}
