//! Core data models
//!
//! Row types for the storage layer plus the report shapes the insight
//! engines consume. Everything here is cheap to clone and serializable so
//! it can flow straight into assistant reply payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a transaction (or category) represents money going out or in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Expense,
    Income,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expense" => Ok(TransactionKind::Expense),
            "income" => Ok(TransactionKind::Income),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

/// A spending or income category
///
/// Default categories are seeded with a NULL user_id and visible to every
/// user; user-created categories carry their owner's id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub kind: TransactionKind,
    pub icon: String,
    pub color: String,
    pub user_id: Option<i64>,
}

/// A persisted transaction, joined with its category name/icon for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub amount: f64,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub user_id: i64,
    pub category_name: Option<String>,
    pub category_icon: Option<String>,
}

/// Income/expense/balance totals over a period
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

/// Per-category totals for a period, ordered by total descending
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBreakdownItem {
    pub category_id: i64,
    pub name: String,
    pub icon: String,
    pub total: f64,
    pub count: i64,
}

/// A monthly budget limit for a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub category_id: i64,
    pub user_id: i64,
    pub monthly_limit: f64,
    pub category_name: String,
    pub category_icon: String,
}

/// Budget limit vs actual spending for one category in one month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetStatusItem {
    pub category_id: i64,
    pub name: String,
    pub icon: String,
    pub monthly_limit: f64,
    pub spent: f64,
    pub remaining: f64,
    pub percentage: f64,
}

impl BudgetStatusItem {
    /// Derive remaining/percentage from limit and spent.
    /// percentage is 0 when the limit is not positive.
    pub fn new(
        category_id: i64,
        name: String,
        icon: String,
        monthly_limit: f64,
        spent: f64,
    ) -> Self {
        let percentage = if monthly_limit > 0.0 {
            spent / monthly_limit * 100.0
        } else {
            0.0
        };
        Self {
            category_id,
            name,
            icon,
            monthly_limit,
            spent,
            remaining: monthly_limit - spent,
            percentage,
        }
    }
}

/// Income and expense totals for one calendar month ("YYYY-MM" key)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    pub month: String,
    pub income: f64,
    pub expense: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_kind_round_trip() {
        assert_eq!(TransactionKind::Expense.as_str(), "expense");
        assert_eq!(
            TransactionKind::from_str("income").unwrap(),
            TransactionKind::Income
        );
        assert!(TransactionKind::from_str("transfer").is_err());
    }

    #[test]
    fn test_budget_status_percentage() {
        let item = BudgetStatusItem::new(1, "Food & Dining".into(), "🍔".into(), 100.0, 80.0);
        assert!((item.percentage - 80.0).abs() < f64::EPSILON);
        assert!((item.remaining - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_budget_status_zero_limit() {
        let item = BudgetStatusItem::new(1, "Food & Dining".into(), "🍔".into(), 0.0, 50.0);
        assert_eq!(item.percentage, 0.0);
    }
}
