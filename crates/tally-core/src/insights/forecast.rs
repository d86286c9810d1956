//! Next-month forecast from weighted monthly history
//!
//! A weighted moving average over the trailing six months, with the most
//! recent months carrying the heaviest weights, plus a coarse trend
//! classification comparing the recent and early thirds of the window.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::db::Database;
use crate::error::Result;

/// Recency ramp; the last `n` weights are kept when fewer months exist,
/// so the newest month always gets the heaviest weight
const WEIGHT_RAMP: [f64; 6] = [1.0, 1.5, 2.0, 2.5, 3.0, 3.5];

/// Months compared on each end of the window for the trend
const TREND_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
    InsufficientData,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
            Trend::InsufficientData => "insufficient_data",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Forecast for the coming month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub predicted_expense: f64,
    pub predicted_income: f64,
    pub predicted_savings: f64,
    pub confidence: Confidence,
    pub trend: Trend,
    pub message: String,
}

impl Forecast {
    /// Sentinel returned when fewer than two months of history exist
    fn insufficient_data() -> Self {
        Self {
            predicted_expense: 0.0,
            predicted_income: 0.0,
            predicted_savings: 0.0,
            confidence: Confidence::Low,
            trend: Trend::InsufficientData,
            message: "Not enough historical data for accurate prediction. Add more transactions!"
                .to_string(),
        }
    }
}

/// Recency-weighted average of chronologically ascending monthly values
///
/// The ramp is truncated from the front, keeping its heaviest tail, then
/// renormalized to sum to 1.
pub(crate) fn weighted_average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len().min(WEIGHT_RAMP.len());
    let values = &values[values.len() - n..];
    let weights = &WEIGHT_RAMP[WEIGHT_RAMP.len() - n..];

    let total: f64 = weights.iter().sum();
    values
        .iter()
        .zip(weights.iter())
        .map(|(v, w)| v * w / total)
        .sum()
}

/// Compare the mean of the newest months against the earliest months
///
/// Boundaries are strict: exactly 1.1x the older mean is still stable.
pub(crate) fn classify_trend(expenses: &[f64]) -> Trend {
    if expenses.len() < TREND_WINDOW {
        return Trend::InsufficientData;
    }

    let recent: f64 =
        expenses[expenses.len() - TREND_WINDOW..].iter().sum::<f64>() / TREND_WINDOW as f64;
    let older: f64 = expenses[..TREND_WINDOW].iter().sum::<f64>() / TREND_WINDOW as f64;

    if recent > older * 1.1 {
        Trend::Increasing
    } else if recent < older * 0.9 {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

fn prediction_message(trend: Trend, expense: f64) -> String {
    match trend {
        Trend::Increasing => format!(
            "📈 Your spending is trending upward. Expected expense: ₹{:.0}",
            expense
        ),
        Trend::Decreasing => format!(
            "📉 Great job! Your spending is decreasing. Expected expense: ₹{:.0}",
            expense
        ),
        Trend::Stable => format!("➡️ Your spending is stable. Expected expense: ₹{:.0}", expense),
        Trend::InsufficientData => {
            "📊 Add more transactions to get accurate predictions.".to_string()
        }
    }
}

/// Weighted-trend forecaster over a user's monthly aggregates
pub struct ForecastEngine<'a> {
    db: &'a Database,
}

impl<'a> ForecastEngine<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Predict next month's totals from the trailing six months
    pub fn predict_next_month(&self, user_id: i64) -> Result<Forecast> {
        let history = self.db.get_monthly_trends(user_id, 6)?;

        if history.len() < 2 {
            return Ok(Forecast::insufficient_data());
        }

        let expenses: Vec<f64> = history.iter().map(|m| m.expense).collect();
        let incomes: Vec<f64> = history.iter().map(|m| m.income).collect();

        let predicted_expense = weighted_average(&expenses);
        let predicted_income = weighted_average(&incomes);
        let trend = classify_trend(&expenses);

        let confidence = if history.len() >= 5 {
            Confidence::High
        } else if history.len() >= 3 {
            Confidence::Medium
        } else {
            Confidence::Low
        };

        Ok(Forecast {
            predicted_expense,
            predicted_income,
            predicted_savings: predicted_income - predicted_expense,
            confidence,
            trend,
            message: prediction_message(trend, predicted_expense),
        })
    }
}
