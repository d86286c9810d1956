//! Entity extraction: amount, description and category hints
//!
//! For action intents the extractor re-runs the intent group's patterns and
//! reads their capture groups. For unrecognized text it falls back to an
//! unconstrained "smart parse": find the first bare number, strip it and
//! any filler verbs, and decide expense-vs-income from income keywords.

use regex::Regex;

use super::intent::{
    add_expense_patterns, add_income_patterns, set_budget_patterns, Intent, AMOUNT, CURRENCY,
};
use crate::error::Result;

/// Words that mark a pattern-missed message as income rather than expense
const INCOME_KEYWORDS: &[&str] = &["received", "earned", "got", "income", "salary", "paid"];

/// A message reduced to its actionable parts
///
/// An action intent without an amount is inactionable; handlers treat it
/// the same as unrecognized input.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    pub intent: Intent,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl ParsedCommand {
    fn bare(intent: Intent) -> Self {
        Self {
            intent,
            amount: None,
            description: None,
            category: None,
        }
    }

    /// Whether this command carries enough to persist a transaction
    pub fn is_actionable(&self) -> bool {
        matches!(self.amount, Some(a) if a > 0.0)
    }
}

pub struct EntityExtractor {
    expense: Vec<Regex>,
    income: Vec<Regex>,
    budget: Vec<Regex>,
    /// First bare number anywhere in the text, currency tokens tolerated
    amount_scan: Regex,
    /// Amount token (with surrounding currency) for description stripping
    amount_strip: Regex,
    /// Filler verbs and connectives removed from smart-parse descriptions
    verb_strip: Regex,
    /// Leading connectives left over in captured descriptions
    leading_connective: Regex,
}

fn compile(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Ok(Regex::new(&format!("(?i){}", p))?))
        .collect()
}

impl EntityExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            expense: compile(&add_expense_patterns())?,
            income: compile(&add_income_patterns())?,
            budget: compile(&set_budget_patterns())?,
            amount_scan: Regex::new(&format!(
                r"(?i){cur}?\s*{num}\s*{cur}?",
                cur = CURRENCY,
                num = AMOUNT
            ))?,
            amount_strip: Regex::new(&format!(
                r"(?i){cur}?\s*\d+(?:\.\d{{1,2}})?\s*{cur}?",
                cur = CURRENCY
            ))?,
            verb_strip: Regex::new(r"(?i)\b(?:spent|paid|for|on|at|expense|income)\b\s*")?,
            leading_connective: Regex::new(r"(?i)^(?:for|on|at)\s+")?,
        })
    }

    /// Extract the actionable parts of a message for a known intent
    pub fn extract(&self, text: &str, intent: Intent) -> ParsedCommand {
        match intent {
            Intent::AddExpense => self.extract_amount_description(text, &self.expense, intent),
            Intent::AddIncome => self.extract_amount_description(text, &self.income, intent),
            Intent::SetBudget => self.extract_budget(text),
            Intent::Unrecognized => self.smart_parse(text),
            other => ParsedCommand::bare(other),
        }
    }

    fn extract_amount_description(
        &self,
        text: &str,
        patterns: &[Regex],
        intent: Intent,
    ) -> ParsedCommand {
        for pattern in patterns {
            if let Some(caps) = pattern.captures(text) {
                let amount = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok());
                if amount.is_none() {
                    continue;
                }
                let description = caps
                    .get(2)
                    .map(|m| self.tidy_description(m.as_str()))
                    .filter(|d| !d.is_empty());
                return ParsedCommand {
                    intent,
                    amount,
                    description,
                    category: None,
                };
            }
        }
        ParsedCommand::bare(intent)
    }

    /// Budget patterns come in two argument orders; whichever capture
    /// parses as a number is the amount, the other is the category text
    fn extract_budget(&self, text: &str) -> ParsedCommand {
        for pattern in &self.budget {
            if let Some(caps) = pattern.captures(text) {
                let first = caps.get(1).map(|m| m.as_str().trim().to_string());
                let second = caps.get(2).map(|m| m.as_str().trim().to_string());

                let (amount, category) = match first.as_deref().and_then(|f| f.parse::<f64>().ok())
                {
                    Some(amount) => (Some(amount), second),
                    None => (
                        second.as_deref().and_then(|s| s.parse::<f64>().ok()),
                        first,
                    ),
                };

                if amount.is_some() {
                    return ParsedCommand {
                        intent: Intent::SetBudget,
                        amount,
                        description: None,
                        category: category.filter(|c| !c.is_empty()),
                    };
                }
            }
        }
        ParsedCommand::bare(Intent::SetBudget)
    }

    /// Unconstrained pass for messages no pattern claimed
    fn smart_parse(&self, text: &str) -> ParsedCommand {
        let Some(caps) = self.amount_scan.captures(text) else {
            return ParsedCommand::bare(Intent::Unrecognized);
        };
        let Some(amount) = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok()) else {
            return ParsedCommand::bare(Intent::Unrecognized);
        };
        if amount <= 0.0 {
            return ParsedCommand::bare(Intent::Unrecognized);
        }

        let without_amount = self.amount_strip.replace_all(text, " ");
        let stripped = self.verb_strip.replace_all(&without_amount, "");
        let description = stripped.trim().to_string();

        let lowered = text.to_lowercase();
        let intent = if INCOME_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
            Intent::AddIncome
        } else {
            Intent::AddExpense
        };

        ParsedCommand {
            intent,
            amount: Some(amount),
            description: if description.is_empty() {
                None
            } else {
                Some(description)
            },
            category: None,
        }
    }

    fn tidy_description(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        let without_connective = self.leading_connective.replace(trimmed, "");
        let without_amount = self.amount_strip.replace_all(&without_connective, " ");
        without_amount
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> EntityExtractor {
        EntityExtractor::new().unwrap()
    }

    #[test]
    fn test_extract_expense() {
        let e = extractor();
        let cmd = e.extract("spent 500 on groceries", Intent::AddExpense);
        assert_eq!(cmd.amount, Some(500.0));
        assert_eq!(cmd.description.as_deref(), Some("groceries"));
        assert!(cmd.is_actionable());
    }

    #[test]
    fn test_extract_expense_with_currency() {
        let e = extractor();
        let cmd = e.extract("paid ₹200.50 for coffee and cake", Intent::AddExpense);
        assert_eq!(cmd.amount, Some(200.50));
        assert_eq!(cmd.description.as_deref(), Some("coffee and cake"));
    }

    #[test]
    fn test_extract_expense_without_description() {
        let e = extractor();
        let cmd = e.extract("spent 100", Intent::AddExpense);
        assert_eq!(cmd.amount, Some(100.0));
        assert_eq!(cmd.description, None);
        assert!(cmd.is_actionable());
    }

    #[test]
    fn test_extract_income() {
        let e = extractor();
        let cmd = e.extract("received 5000 from freelance work", Intent::AddIncome);
        assert_eq!(cmd.intent, Intent::AddIncome);
        assert_eq!(cmd.amount, Some(5000.0));
        assert_eq!(cmd.description.as_deref(), Some("freelance work"));
    }

    #[test]
    fn test_extract_salary_shorthand() {
        let e = extractor();
        let cmd = e.extract("salary of 50000", Intent::AddIncome);
        assert_eq!(cmd.amount, Some(50000.0));
        assert_eq!(cmd.description, None);
    }

    #[test]
    fn test_extract_budget_amount_first() {
        let e = extractor();
        let cmd = e.extract("set budget of 5000 for food", Intent::SetBudget);
        assert_eq!(cmd.amount, Some(5000.0));
        assert_eq!(cmd.category.as_deref(), Some("food"));
    }

    #[test]
    fn test_extract_budget_category_first() {
        let e = extractor();
        let cmd = e.extract("budget food to 5000", Intent::SetBudget);
        assert_eq!(cmd.amount, Some(5000.0));
        assert_eq!(cmd.category.as_deref(), Some("food"));
    }

    #[test]
    fn test_extract_budget_missing_category() {
        let e = extractor();
        let cmd = e.extract("set budget 2000", Intent::SetBudget);
        assert_eq!(cmd.amount, Some(2000.0));
        assert_eq!(cmd.category, None);
    }

    #[test]
    fn test_smart_parse_defaults_to_expense() {
        let e = extractor();
        let cmd = e.extract("groceries 450", Intent::Unrecognized);
        assert_eq!(cmd.intent, Intent::AddExpense);
        assert_eq!(cmd.amount, Some(450.0));
        assert_eq!(cmd.description.as_deref(), Some("groceries"));
    }

    #[test]
    fn test_smart_parse_income_keyword() {
        let e = extractor();
        let cmd = e.extract("bonus got 2000 woo", Intent::Unrecognized);
        assert_eq!(cmd.intent, Intent::AddIncome);
        assert_eq!(cmd.amount, Some(2000.0));
    }

    #[test]
    fn test_smart_parse_without_number_is_inactionable() {
        let e = extractor();
        let cmd = e.extract("tell me a joke", Intent::Unrecognized);
        assert_eq!(cmd.intent, Intent::Unrecognized);
        assert!(!cmd.is_actionable());
    }

    #[test]
    fn test_query_intents_have_no_entities() {
        let e = extractor();
        let cmd = e.extract("what's my balance", Intent::CheckBalance);
        assert_eq!(cmd, ParsedCommand::bare(Intent::CheckBalance));
    }
}
