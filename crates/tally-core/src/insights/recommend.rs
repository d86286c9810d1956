//! Rule-based financial recommendations
//!
//! Fixed rules evaluated independently against the current summary,
//! breakdown, budgets and forecast; every rule that fires appends one
//! recommendation, in rule order. Rules never suppress each other.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::forecast::{ForecastEngine, Trend};
use crate::db::Database;
use crate::error::Result;
use crate::models::TransactionKind;

/// Savings rate below this share of income warrants a nudge
const LOW_SAVINGS_PERCENT: f64 = 10.0;

/// Savings rate at or above this share of income earns praise
const GOOD_SAVINGS_PERCENT: f64 = 20.0;

/// A single category above this share of spending is worth reviewing
const TOP_CATEGORY_PERCENT: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A piece of advice, generated fresh per query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub icon: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

impl Recommendation {
    fn new(icon: &str, title: impl Into<String>, description: impl Into<String>, priority: Priority) -> Self {
        Self {
            icon: icon.to_string(),
            title: title.into(),
            description: description.into(),
            priority,
        }
    }
}

/// Rule-based advice generator
pub struct RecommendationEngine<'a> {
    db: &'a Database,
}

impl<'a> RecommendationEngine<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn get_recommendations(&self, user_id: i64) -> Result<Vec<Recommendation>> {
        let today = chrono::Local::now().date_naive();
        let month_start =
            chrono::NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);

        let summary = self.db.get_summary(user_id, Some(month_start), None)?;
        let breakdown = self.db.get_category_breakdown(
            user_id,
            Some(month_start),
            None,
            TransactionKind::Expense,
        )?;
        let forecast = ForecastEngine::new(self.db).predict_next_month(user_id)?;

        let mut recommendations = Vec::new();

        // Savings ratio: the two thresholds are mutually exclusive
        if summary.income > 0.0 {
            let savings_ratio = (summary.income - summary.expense) / summary.income * 100.0;
            if savings_ratio < LOW_SAVINGS_PERCENT {
                recommendations.push(Recommendation::new(
                    "💰",
                    "Increase Your Savings",
                    format!(
                        "Your current savings rate is {:.1}%. Aim for at least 20% of your income.",
                        savings_ratio
                    ),
                    Priority::High,
                ));
            } else if savings_ratio >= GOOD_SAVINGS_PERCENT {
                recommendations.push(Recommendation::new(
                    "🌟",
                    "Great Savings Rate!",
                    format!(
                        "You're saving {:.1}% of your income. Keep it up!",
                        savings_ratio
                    ),
                    Priority::Low,
                ));
            }
        }

        // Dominant spending category
        if let Some(top) = breakdown.first() {
            let total: f64 = breakdown.iter().map(|c| c.total).sum();
            if total > 0.0 {
                let share = top.total / total * 100.0;
                if share > TOP_CATEGORY_PERCENT {
                    recommendations.push(Recommendation::new(
                        "⚠️",
                        format!("Review {} Spending", top.name),
                        format!(
                            "{} accounts for {:.0}% of your expenses. Consider reducing it.",
                            top.name, share
                        ),
                        Priority::Medium,
                    ));
                }
            }
        }

        // No budgets configured at all
        if self.db.get_budgets(user_id)?.is_empty() {
            recommendations.push(Recommendation::new(
                "📋",
                "Set Up Budgets",
                "Create monthly budgets for your expense categories to better track spending.",
                Priority::Medium,
            ));
        }

        // Forecast trend
        if forecast.trend == Trend::Increasing {
            recommendations.push(Recommendation::new(
                "📈",
                "Watch Your Spending Trend",
                "Your expenses are increasing month over month. Review recent purchases.",
                Priority::High,
            ));
        }

        // Emergency fund
        if summary.balance > 0.0 {
            recommendations.push(Recommendation::new(
                "🏦",
                "Build Emergency Fund",
                "Consider saving 3-6 months of expenses in an emergency fund.",
                Priority::Low,
            ));
        }

        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Months, NaiveDate};

    fn category(db: &Database, name: &str) -> i64 {
        db.get_category_by_name(name, 1).unwrap().unwrap().id
    }

    fn this_month(db: &Database, category_id: i64, kind: TransactionKind, amount: f64) {
        let today = chrono::Local::now().date_naive();
        let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap();
        db.add_transaction(amount, None, category_id, kind, first, 1)
            .unwrap();
    }

    #[test]
    fn test_low_savings_rate_fires_high_priority() {
        let db = Database::in_memory().unwrap();
        let salary = category(&db, "Salary");
        let food = category(&db, "Food & Dining");

        this_month(&db, salary, TransactionKind::Income, 1000.0);
        this_month(&db, food, TransactionKind::Expense, 950.0);

        let recs = RecommendationEngine::new(&db).get_recommendations(1).unwrap();
        let savings = recs.iter().find(|r| r.title.contains("Increase")).unwrap();
        assert_eq!(savings.priority, Priority::High);
        // The praise rule must not fire at the same time
        assert!(!recs.iter().any(|r| r.title.contains("Great Savings")));
    }

    #[test]
    fn test_good_savings_rate_earns_praise() {
        let db = Database::in_memory().unwrap();
        let salary = category(&db, "Salary");
        let food = category(&db, "Food & Dining");

        this_month(&db, salary, TransactionKind::Income, 1000.0);
        this_month(&db, food, TransactionKind::Expense, 700.0);

        let recs = RecommendationEngine::new(&db).get_recommendations(1).unwrap();
        let praise = recs.iter().find(|r| r.title.contains("Great Savings")).unwrap();
        assert_eq!(praise.priority, Priority::Low);
    }

    #[test]
    fn test_top_category_review() {
        let db = Database::in_memory().unwrap();
        let food = category(&db, "Food & Dining");
        let transport = category(&db, "Transport");

        this_month(&db, food, TransactionKind::Expense, 900.0);
        this_month(&db, transport, TransactionKind::Expense, 100.0);

        let recs = RecommendationEngine::new(&db).get_recommendations(1).unwrap();
        let review = recs
            .iter()
            .find(|r| r.title == "Review Food & Dining Spending")
            .unwrap();
        assert_eq!(review.priority, Priority::Medium);
        assert!(review.description.contains("90%"));
    }

    #[test]
    fn test_missing_budgets_rule() {
        let db = Database::in_memory().unwrap();
        let recs = RecommendationEngine::new(&db).get_recommendations(1).unwrap();
        assert!(recs.iter().any(|r| r.title == "Set Up Budgets"));

        // Rule stops firing once any budget exists
        let food = category(&db, "Food & Dining");
        db.set_budget(food, 1, 1000.0).unwrap();
        let recs = RecommendationEngine::new(&db).get_recommendations(1).unwrap();
        assert!(!recs.iter().any(|r| r.title == "Set Up Budgets"));
    }

    #[test]
    fn test_increasing_trend_rule() {
        let db = Database::in_memory().unwrap();
        let food = category(&db, "Food & Dining");

        // Four points so the trend windows only partially overlap:
        // recent mean 300 vs older mean 200
        let today = chrono::Local::now().date_naive();
        let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap();
        for (offset, amount) in [(4u32, 100.0), (3, 100.0), (2, 400.0), (1, 400.0)] {
            let date = first.checked_sub_months(Months::new(offset)).unwrap();
            db.add_transaction(amount, None, food, TransactionKind::Expense, date, 1)
                .unwrap();
        }

        let recs = RecommendationEngine::new(&db).get_recommendations(1).unwrap();
        let trend = recs
            .iter()
            .find(|r| r.title == "Watch Your Spending Trend")
            .unwrap();
        assert_eq!(trend.priority, Priority::High);
    }

    #[test]
    fn test_positive_balance_emergency_fund() {
        let db = Database::in_memory().unwrap();
        let salary = category(&db, "Salary");
        this_month(&db, salary, TransactionKind::Income, 1000.0);

        let recs = RecommendationEngine::new(&db).get_recommendations(1).unwrap();
        let fund = recs.iter().find(|r| r.title == "Build Emergency Fund").unwrap();
        assert_eq!(fund.priority, Priority::Low);
    }

    #[test]
    fn test_rules_append_in_order() {
        let db = Database::in_memory().unwrap();
        let salary = category(&db, "Salary");
        let food = category(&db, "Food & Dining");

        this_month(&db, salary, TransactionKind::Income, 1000.0);
        this_month(&db, food, TransactionKind::Expense, 950.0);

        let recs = RecommendationEngine::new(&db).get_recommendations(1).unwrap();
        let titles: Vec<&str> = recs.iter().map(|r| r.title.as_str()).collect();
        // Savings rule before top-category, budgets before emergency fund
        let savings_pos = titles.iter().position(|t| t.contains("Increase")).unwrap();
        let budget_pos = titles.iter().position(|t| *t == "Set Up Budgets").unwrap();
        let fund_pos = titles
            .iter()
            .position(|t| *t == "Build Emergency Fund")
            .unwrap();
        assert!(savings_pos < budget_pos);
        assert!(budget_pos < fund_pos);
    }
}
