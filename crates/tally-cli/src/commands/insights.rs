//! Report generation commands: forecast, alerts, recommendations

use std::path::Path;

use anyhow::Result;
use tally_core::{AlertEngine, ForecastEngine, RecommendationEngine, Severity};

use super::core::open_db;

pub fn cmd_forecast(db_path: &Path, user: i64) -> Result<()> {
    let db = open_db(db_path)?;
    let forecast = ForecastEngine::new(&db).predict_next_month(user)?;

    println!("🔮 Next Month Forecast");
    println!();
    println!("   Expected expenses: ₹{:.2}", forecast.predicted_expense);
    println!("   Expected income:   ₹{:.2}", forecast.predicted_income);
    println!("   Expected savings:  ₹{:.2}", forecast.predicted_savings);
    println!("   Trend:             {}", forecast.trend);
    println!("   Confidence:        {}", forecast.confidence);
    println!();
    println!("{}", forecast.message);

    Ok(())
}

pub fn cmd_alerts(db_path: &Path, user: i64) -> Result<()> {
    let db = open_db(db_path)?;
    let alerts = AlertEngine::new(&db).detect_overspending(user)?;

    if alerts.is_empty() {
        println!("✅ No overspending detected. Nice!");
        return Ok(());
    }

    println!("🚨 {} alert(s)", alerts.len());
    println!();
    for alert in alerts {
        let marker = match alert.severity {
            Severity::High => "🔴",
            Severity::Medium => "🟠",
            Severity::Low => "🟡",
        };
        println!("{} {} {}: {}", marker, alert.icon, alert.category, alert.message);
    }

    Ok(())
}

pub fn cmd_recommend(db_path: &Path, user: i64) -> Result<()> {
    let db = open_db(db_path)?;
    let recommendations = RecommendationEngine::new(&db).get_recommendations(user)?;

    if recommendations.is_empty() {
        println!("💰 Nothing to suggest right now. Keep tracking!");
        return Ok(());
    }

    println!("💡 Recommendations");
    println!();
    for rec in recommendations {
        println!("{} {} [{}]", rec.icon, rec.title, rec.priority);
        println!("   {}", rec.description);
    }

    Ok(())
}
