//! Overspend alert detection
//!
//! Two passes, appended in order: budget threshold checks first, then a
//! high-spending heuristic against the 3-month average. A category gets at
//! most one alert per query; budget alerts always win over the heuristic.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::db::Database;
use crate::error::Result;
use crate::models::TransactionKind;

/// Spending above this share of the average monthly expense is notable
const HIGH_SPENDING_RATIO: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    BudgetExceeded,
    BudgetWarning,
    HighSpending,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::BudgetExceeded => "budget_exceeded",
            AlertKind::BudgetWarning => "budget_warning",
            AlertKind::HighSpending => "high_spending",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    /// Numeric priority for sorting (higher = more urgent)
    pub fn priority(&self) -> u8 {
        match self {
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low => 1,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single overspend finding, generated fresh per query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub category: String,
    pub icon: String,
    pub kind: AlertKind,
    pub severity: Severity,
    pub message: String,
    pub percentage: f64,
}

/// Threshold-based overspend detector
pub struct AlertEngine<'a> {
    db: &'a Database,
}

impl<'a> AlertEngine<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Detect budget breaches and unusual category spending
    pub fn detect_overspending(&self, user_id: i64) -> Result<Vec<Alert>> {
        let mut alerts = Vec::new();

        // Pass 1: configured budgets
        for item in self.db.get_budget_status(user_id, None)? {
            if item.percentage >= 100.0 {
                alerts.push(Alert {
                    category: item.name.clone(),
                    icon: item.icon.clone(),
                    kind: AlertKind::BudgetExceeded,
                    severity: Severity::High,
                    message: format!(
                        "Budget exceeded! Spent ₹{:.0} of ₹{:.0} limit",
                        item.spent, item.monthly_limit
                    ),
                    percentage: item.percentage,
                });
            } else if item.percentage >= 80.0 {
                alerts.push(Alert {
                    category: item.name.clone(),
                    icon: item.icon.clone(),
                    kind: AlertKind::BudgetWarning,
                    severity: Severity::Medium,
                    message: format!("Approaching budget limit! {:.0}% used", item.percentage),
                    percentage: item.percentage,
                });
            }
        }

        // Pass 2: category spikes vs the 3-month average monthly expense,
        // skipping categories already alerted above
        let history = self.db.get_monthly_trends(user_id, 3)?;
        if !history.is_empty() {
            let average: f64 =
                history.iter().map(|m| m.expense).sum::<f64>() / history.len() as f64;

            let today = chrono::Local::now().date_naive();
            let month_start =
                chrono::NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
            let breakdown = self.db.get_category_breakdown(
                user_id,
                Some(month_start),
                None,
                TransactionKind::Expense,
            )?;

            for item in breakdown {
                let already_alerted = alerts.iter().any(|a| a.category == item.name);
                if item.total > average * HIGH_SPENDING_RATIO && !already_alerted {
                    alerts.push(Alert {
                        category: item.name,
                        icon: item.icon,
                        kind: AlertKind::HighSpending,
                        severity: Severity::Low,
                        message: format!("High spending detected: ₹{:.0} this month", item.total),
                        percentage: 0.0,
                    });
                }
            }
        }

        Ok(alerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn setup() -> (Database, i64) {
        let db = Database::in_memory().unwrap();
        let food = db
            .get_category_by_name("Food & Dining", 1)
            .unwrap()
            .unwrap()
            .id;
        (db, food)
    }

    fn spend_this_month(db: &Database, category: i64, amount: f64) {
        let today = chrono::Local::now().date_naive();
        let first = chrono::NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap();
        db.add_transaction(amount, None, category, TransactionKind::Expense, first, 1)
            .unwrap();
    }

    #[test]
    fn test_budget_exceeded_at_exactly_100_percent() {
        let (db, food) = setup();
        db.set_budget(food, 1, 100.0).unwrap();
        spend_this_month(&db, food, 100.0);

        let alerts = AlertEngine::new(&db).detect_overspending(1).unwrap();
        assert_eq!(alerts[0].kind, AlertKind::BudgetExceeded);
        assert_eq!(alerts[0].severity, Severity::High);
        assert!((alerts[0].percentage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_budget_warning_at_80_percent() {
        let (db, food) = setup();
        db.set_budget(food, 1, 100.0).unwrap();
        spend_this_month(&db, food, 80.0);

        let alerts = AlertEngine::new(&db).detect_overspending(1).unwrap();
        let budget_alert = alerts
            .iter()
            .find(|a| a.kind != AlertKind::HighSpending)
            .unwrap();
        assert_eq!(budget_alert.kind, AlertKind::BudgetWarning);
        assert_eq!(budget_alert.severity, Severity::Medium);
    }

    #[test]
    fn test_no_budget_alert_below_80_percent() {
        let (db, food) = setup();
        db.set_budget(food, 1, 100.0).unwrap();
        spend_this_month(&db, food, 79.0);

        let alerts = AlertEngine::new(&db).detect_overspending(1).unwrap();
        assert!(!alerts
            .iter()
            .any(|a| matches!(a.kind, AlertKind::BudgetExceeded | AlertKind::BudgetWarning)));
    }

    #[test]
    fn test_budget_alert_suppresses_high_spending() {
        let (db, food) = setup();
        db.set_budget(food, 1, 100.0).unwrap();
        // Well above both the budget and the 3-month-average heuristic
        spend_this_month(&db, food, 500.0);

        let alerts = AlertEngine::new(&db).detect_overspending(1).unwrap();
        let food_alerts: Vec<_> = alerts
            .iter()
            .filter(|a| a.category == "Food & Dining")
            .collect();
        assert_eq!(food_alerts.len(), 1);
        assert_eq!(food_alerts[0].kind, AlertKind::BudgetExceeded);
    }

    #[test]
    fn test_high_spending_without_budget() {
        let (db, food) = setup();
        spend_this_month(&db, food, 500.0);

        let alerts = AlertEngine::new(&db).detect_overspending(1).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::HighSpending);
        assert_eq!(alerts[0].severity, Severity::Low);
        assert_eq!(alerts[0].percentage, 0.0);
    }

    #[test]
    fn test_severity_priority_ordering() {
        assert!(Severity::High.priority() > Severity::Medium.priority());
        assert!(Severity::Medium.priority() > Severity::Low.priority());
    }
}
