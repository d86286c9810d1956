//! Status and transaction-listing commands

use std::path::Path;

use anyhow::Result;
use tally_core::TransactionKind;

use super::core::{build_assistant, open_db};

pub fn cmd_recent(db_path: &Path, user: i64, limit: i64) -> Result<()> {
    let db = open_db(db_path)?;
    let transactions = db.get_transactions(user, None, None, None, None, Some(limit))?;

    if transactions.is_empty() {
        println!("📝 No transactions recorded yet.");
        return Ok(());
    }

    println!("📋 Last {} transaction(s)", transactions.len());
    println!();
    for t in transactions {
        let sign = match t.kind {
            TransactionKind::Expense => "-",
            TransactionKind::Income => "+",
        };
        println!(
            "  {}  {}₹{:<10.2} {} {}",
            t.date,
            sign,
            t.amount,
            t.category_icon.as_deref().unwrap_or("📦"),
            t.description.as_deref().unwrap_or("No description"),
        );
    }

    Ok(())
}

pub fn cmd_status(db_path: &Path, user: i64) -> Result<()> {
    let db = open_db(db_path)?;
    let overall = db.get_summary(user, None, None)?;
    let snapshot = tally_core::insights::spending_snapshot(&db, user)?;

    println!("📊 Tally status");
    println!();
    println!("   All-time income:  ₹{:.2}", overall.income);
    println!("   All-time expense: ₹{:.2}", overall.expense);
    println!("   Balance:          ₹{:.2}", overall.balance);
    println!();
    println!(
        "   This month: ₹{:.2} spent ({:+.1}% vs last month), ₹{:.2}/day",
        snapshot.current.expense, snapshot.expense_change_pct, snapshot.daily_average
    );
    if let Some(top) = &snapshot.biggest_category {
        println!("   Biggest category: {} {} (₹{:.2})", top.icon, top.name, top.total);
    }
    println!();

    let assistant = build_assistant(&db)?;
    println!("{}", assistant.quick_insights(user)?);

    Ok(())
}
