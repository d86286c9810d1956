//! Category breakdowns and monthly trend aggregates

use std::collections::BTreeMap;

use chrono::{Months, NaiveDate};
use rusqlite::params;

use super::Database;
use crate::error::Result;
use crate::models::{CategoryBreakdownItem, MonthlyAggregate, TransactionKind};

impl Database {
    /// Per-category totals for a period, ordered by total descending
    pub fn get_category_breakdown(
        &self,
        user_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        kind: TransactionKind,
    ) -> Result<Vec<CategoryBreakdownItem>> {
        let conn = self.conn()?;

        let mut sql = String::from(
            "SELECT c.id, c.name, c.icon, SUM(t.amount) as total, COUNT(t.id)
             FROM transactions t
             JOIN categories c ON t.category_id = c.id
             WHERE t.kind = ? AND t.user_id = ?",
        );
        let mut query_params: Vec<Box<dyn rusqlite::ToSql>> =
            vec![Box::new(kind.as_str()), Box::new(user_id)];

        if let Some(s) = start {
            sql.push_str(" AND t.date >= ?");
            query_params.push(Box::new(s.to_string()));
        }
        if let Some(e) = end {
            sql.push_str(" AND t.date <= ?");
            query_params.push(Box::new(e.to_string()));
        }
        sql.push_str(" GROUP BY c.id ORDER BY total DESC");

        let param_refs: Vec<&dyn rusqlite::ToSql> =
            query_params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(param_refs.as_slice(), |row| {
            Ok(CategoryBreakdownItem {
                category_id: row.get(0)?,
                name: row.get(1)?,
                icon: row.get(2)?,
                total: row.get(3)?,
                count: row.get(4)?,
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Monthly income/expense totals for the trailing window, oldest first
    ///
    /// Months with transactions of only one kind report 0 for the other.
    pub fn get_monthly_trends(&self, user_id: i64, months: u32) -> Result<Vec<MonthlyAggregate>> {
        let conn = self.conn()?;

        let cutoff = chrono::Local::now()
            .date_naive()
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN);

        let mut stmt = conn.prepare(
            "SELECT strftime('%Y-%m', date) as month, kind, SUM(amount)
             FROM transactions
             WHERE user_id = ? AND date >= ?
             GROUP BY month, kind
             ORDER BY month",
        )?;
        let rows = stmt.query_map(params![user_id, cutoff.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
            ))
        })?;

        // Pivot kind rows into one aggregate per month; BTreeMap keeps the
        // "YYYY-MM" keys chronologically ascending.
        let mut by_month: BTreeMap<String, MonthlyAggregate> = BTreeMap::new();
        for row in rows {
            let (month, kind, total) = row?;
            let entry = by_month
                .entry(month.clone())
                .or_insert_with(|| MonthlyAggregate {
                    month,
                    income: 0.0,
                    expense: 0.0,
                });
            match kind.as_str() {
                "income" => entry.income = total,
                "expense" => entry.expense = total,
                _ => {}
            }
        }

        Ok(by_month.into_values().collect())
    }

    /// Daily expense totals for the trailing window, oldest first
    pub fn get_daily_expenses(&self, user_id: i64, days: u32) -> Result<Vec<(NaiveDate, f64)>> {
        let conn = self.conn()?;

        let cutoff = chrono::Local::now().date_naive() - chrono::Duration::days(days as i64);

        let mut stmt = conn.prepare(
            "SELECT date, SUM(amount)
             FROM transactions
             WHERE kind = 'expense' AND user_id = ? AND date >= ?
             GROUP BY date
             ORDER BY date",
        )?;
        let rows = stmt.query_map(params![user_id, cutoff.to_string()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?;

        let mut result = Vec::new();
        for row in rows {
            let (date, total) = row?;
            result.push((super::parse_date(&date), total));
        }
        Ok(result)
    }
}
