//! Budget limits and budget-vs-actual status

use rusqlite::params;

use super::Database;
use crate::error::Result;
use crate::models::{Budget, BudgetStatusItem};

impl Database {
    /// Set or replace the monthly limit for a category (upsert)
    pub fn set_budget(&self, category_id: i64, user_id: i64, monthly_limit: f64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO budgets (category_id, user_id, monthly_limit)
             VALUES (?, ?, ?)
             ON CONFLICT(category_id, user_id) DO UPDATE SET monthly_limit = excluded.monthly_limit",
            params![category_id, user_id, monthly_limit],
        )?;
        Ok(())
    }

    /// List all budget limits for a user
    pub fn get_budgets(&self, user_id: i64) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT b.id, b.category_id, b.user_id, b.monthly_limit, c.name, c.icon
             FROM budgets b
             JOIN categories c ON b.category_id = c.id
             WHERE b.user_id = ?",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(Budget {
                id: row.get(0)?,
                category_id: row.get(1)?,
                user_id: row.get(2)?,
                monthly_limit: row.get(3)?,
                category_name: row.get(4)?,
                category_icon: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Budget vs actual spending for each budgeted category in a month
    ///
    /// `month` is a "YYYY-MM" key; defaults to the current month.
    pub fn get_budget_status(
        &self,
        user_id: i64,
        month: Option<&str>,
    ) -> Result<Vec<BudgetStatusItem>> {
        let month = match month {
            Some(m) => m.to_string(),
            None => chrono::Local::now().format("%Y-%m").to_string(),
        };

        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT c.id, c.name, c.icon, b.monthly_limit, COALESCE(SUM(t.amount), 0) as spent
             FROM categories c
             JOIN budgets b ON c.id = b.category_id AND b.user_id = ?
             LEFT JOIN transactions t ON c.id = t.category_id
                 AND t.kind = 'expense'
                 AND t.user_id = ?
                 AND strftime('%Y-%m', t.date) = ?
             WHERE (c.user_id = ? OR c.user_id IS NULL) AND c.kind = 'expense'
             GROUP BY c.id",
        )?;
        let rows = stmt.query_map(params![user_id, user_id, month, user_id], |row| {
            Ok(BudgetStatusItem::new(
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
            ))
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;
    use chrono::Datelike;

    #[test]
    fn test_set_budget_upsert() {
        let db = Database::in_memory().unwrap();
        let food = db
            .get_category_by_name("Food & Dining", 1)
            .unwrap()
            .unwrap()
            .id;

        db.set_budget(food, 1, 5000.0).unwrap();
        db.set_budget(food, 1, 8000.0).unwrap();

        let budgets = db.get_budgets(1).unwrap();
        assert_eq!(budgets.len(), 1);
        assert!((budgets[0].monthly_limit - 8000.0).abs() < 1e-9);
        assert_eq!(budgets[0].category_name, "Food & Dining");
    }

    #[test]
    fn test_budget_status_round_trip() {
        let db = Database::in_memory().unwrap();
        let food = db
            .get_category_by_name("Food & Dining", 1)
            .unwrap()
            .unwrap()
            .id;

        let today = chrono::Local::now().date_naive();
        let first = chrono::NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap();

        db.set_budget(food, 1, 100.0).unwrap();
        db.add_transaction(80.0, None, food, TransactionKind::Expense, first, 1)
            .unwrap();

        let status = db.get_budget_status(1, None).unwrap();
        assert_eq!(status.len(), 1);
        let item = &status[0];
        assert!((item.spent - 80.0).abs() < 1e-9);
        assert!((item.remaining - 20.0).abs() < 1e-9);
        assert!((item.percentage - 80.0).abs() < 1e-9);

        // Overwriting the limit recomputes remaining/percentage
        db.set_budget(food, 1, 160.0).unwrap();
        let status = db.get_budget_status(1, None).unwrap();
        assert!((status[0].remaining - 80.0).abs() < 1e-9);
        assert!((status[0].percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_budget_status_only_budgeted_categories() {
        let db = Database::in_memory().unwrap();
        let food = db
            .get_category_by_name("Food & Dining", 1)
            .unwrap()
            .unwrap()
            .id;
        let transport = db.get_category_by_name("Transport", 1).unwrap().unwrap().id;

        db.set_budget(food, 1, 1000.0).unwrap();
        let today = chrono::Local::now().date_naive();
        db.add_transaction(50.0, None, transport, TransactionKind::Expense, today, 1)
            .unwrap();

        let status = db.get_budget_status(1, None).unwrap();
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].name, "Food & Dining");
    }
}
