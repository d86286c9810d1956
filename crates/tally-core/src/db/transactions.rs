//! Transaction operations and period summaries

use chrono::NaiveDate;
use rusqlite::{params, Row};

use super::{parse_date, Database};
use crate::error::Result;
use crate::models::{Summary, Transaction, TransactionKind};

fn map_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let kind: String = row.get(4)?;
    let kind = kind.parse::<TransactionKind>().map_err(|_| {
        rusqlite::Error::InvalidColumnType(4, "kind".into(), rusqlite::types::Type::Text)
    })?;
    let date: String = row.get(5)?;
    Ok(Transaction {
        id: row.get(0)?,
        amount: row.get(1)?,
        description: row.get(2)?,
        category_id: row.get(3)?,
        kind,
        date: parse_date(&date),
        user_id: row.get(6)?,
        category_name: row.get(7)?,
        category_icon: row.get(8)?,
    })
}

impl Database {
    /// Insert a transaction, returning its id
    pub fn add_transaction(
        &self,
        amount: f64,
        description: Option<&str>,
        category_id: i64,
        kind: TransactionKind,
        date: NaiveDate,
        user_id: i64,
    ) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO transactions (amount, description, category_id, kind, date, user_id)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                amount,
                description,
                category_id,
                kind.as_str(),
                date.to_string(),
                user_id
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List transactions with optional filters, newest first
    pub fn get_transactions(
        &self,
        user_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        kind: Option<TransactionKind>,
        category_id: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;

        let mut sql = String::from(
            "SELECT t.id, t.amount, t.description, t.category_id, t.kind, t.date, t.user_id,
                    c.name, c.icon
             FROM transactions t
             LEFT JOIN categories c ON t.category_id = c.id
             WHERE t.user_id = ?",
        );
        let mut query_params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

        if let Some(s) = start {
            sql.push_str(" AND t.date >= ?");
            query_params.push(Box::new(s.to_string()));
        }
        if let Some(e) = end {
            sql.push_str(" AND t.date <= ?");
            query_params.push(Box::new(e.to_string()));
        }
        if let Some(k) = kind {
            sql.push_str(" AND t.kind = ?");
            query_params.push(Box::new(k.as_str()));
        }
        if let Some(c) = category_id {
            sql.push_str(" AND t.category_id = ?");
            query_params.push(Box::new(c));
        }

        sql.push_str(" ORDER BY t.date DESC, t.created_at DESC, t.id DESC");

        if let Some(l) = limit {
            sql.push_str(" LIMIT ?");
            query_params.push(Box::new(l));
        }

        let param_refs: Vec<&dyn rusqlite::ToSql> =
            query_params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(param_refs.as_slice(), map_transaction)?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Income/expense/balance totals over an optional date range
    pub fn get_summary(
        &self,
        user_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Summary> {
        let conn = self.conn()?;

        let mut sql = String::from(
            "SELECT kind, COALESCE(SUM(amount), 0) FROM transactions WHERE user_id = ?",
        );
        let mut query_params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

        if let Some(s) = start {
            sql.push_str(" AND date >= ?");
            query_params.push(Box::new(s.to_string()));
        }
        if let Some(e) = end {
            sql.push_str(" AND date <= ?");
            query_params.push(Box::new(e.to_string()));
        }
        sql.push_str(" GROUP BY kind");

        let param_refs: Vec<&dyn rusqlite::ToSql> =
            query_params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(param_refs.as_slice(), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?;

        let mut summary = Summary::default();
        for row in rows {
            let (kind, total) = row?;
            match kind.as_str() {
                "income" => summary.income = total,
                "expense" => summary.expense = total,
                _ => {}
            }
        }
        summary.balance = summary.income - summary.expense;

        Ok(summary)
    }
}
