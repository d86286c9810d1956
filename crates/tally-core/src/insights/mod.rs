//! Analysis engines over transaction history
//!
//! - `forecast` - weighted moving average prediction + trend classification
//! - `alerts` - budget/overspend threshold detection
//! - `recommend` - rule-based advice
//!
//! Engines pull aggregated history from storage on demand; nothing here is
//! message-driven or persisted.

pub mod alerts;
pub mod forecast;
pub mod recommend;

pub use alerts::{Alert, AlertEngine, AlertKind, Severity};
pub use forecast::{Confidence, Forecast, ForecastEngine, Trend};
pub use recommend::{Priority, Recommendation, RecommendationEngine};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::error::Result;
use crate::models::{CategoryBreakdownItem, Summary, TransactionKind};

/// Month-over-month snapshot of spending behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingSnapshot {
    pub current: Summary,
    pub previous: Summary,
    /// Percent change vs last month; 0 when last month had no expenses
    pub expense_change_pct: f64,
    /// Percent change vs last month; 0 when last month had no income
    pub income_change_pct: f64,
    pub daily_average: f64,
    pub most_frequent_category: Option<CategoryBreakdownItem>,
    pub biggest_category: Option<CategoryBreakdownItem>,
    pub categories_used: usize,
}

/// Compare the current month against the previous one
pub fn spending_snapshot(db: &Database, user_id: i64) -> Result<SpendingSnapshot> {
    let today = chrono::Local::now().date_naive();
    let month_start =
        chrono::NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
    let prev_end = month_start - chrono::Duration::days(1);
    let prev_start =
        chrono::NaiveDate::from_ymd_opt(prev_end.year(), prev_end.month(), 1).unwrap_or(prev_end);

    let current = db.get_summary(user_id, Some(month_start), None)?;
    let previous = db.get_summary(user_id, Some(prev_start), Some(prev_end))?;
    let breakdown =
        db.get_category_breakdown(user_id, Some(month_start), None, TransactionKind::Expense)?;

    let expense_change_pct = if previous.expense > 0.0 {
        (current.expense - previous.expense) / previous.expense * 100.0
    } else {
        0.0
    };
    let income_change_pct = if previous.income > 0.0 {
        (current.income - previous.income) / previous.income * 100.0
    } else {
        0.0
    };

    let daily_average = current.expense / today.day() as f64;
    let most_frequent_category = breakdown.iter().max_by_key(|c| c.count).cloned();
    let biggest_category = breakdown.first().cloned();
    let categories_used = breakdown.len();

    Ok(SpendingSnapshot {
        current,
        previous,
        expense_change_pct,
        income_change_pct,
        daily_average,
        most_frequent_category,
        biggest_category,
        categories_used,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_snapshot_month_over_month() {
        let db = Database::in_memory().unwrap();
        let food = db
            .get_category_by_name("Food & Dining", 1)
            .unwrap()
            .unwrap()
            .id;

        let today = chrono::Local::now().date_naive();
        let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap();
        let prev = first - chrono::Duration::days(1);

        db.add_transaction(200.0, None, food, TransactionKind::Expense, prev, 1)
            .unwrap();
        db.add_transaction(300.0, None, food, TransactionKind::Expense, first, 1)
            .unwrap();

        let snapshot = spending_snapshot(&db, 1).unwrap();
        assert!((snapshot.current.expense - 300.0).abs() < 1e-9);
        assert!((snapshot.previous.expense - 200.0).abs() < 1e-9);
        assert!((snapshot.expense_change_pct - 50.0).abs() < 1e-9);
        assert_eq!(snapshot.categories_used, 1);
        assert_eq!(
            snapshot.biggest_category.as_ref().map(|c| c.name.as_str()),
            Some("Food & Dining")
        );
    }

    #[test]
    fn test_snapshot_empty_previous_month() {
        let db = Database::in_memory().unwrap();
        let snapshot = spending_snapshot(&db, 1).unwrap();
        assert_eq!(snapshot.expense_change_pct, 0.0);
        assert_eq!(snapshot.income_change_pct, 0.0);
        assert!(snapshot.biggest_category.is_none());
    }
}
