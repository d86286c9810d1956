//! Intent classification over ordered pattern groups
//!
//! A message is matched against a fixed, prioritized list of intent groups;
//! the first group with any matching pattern wins. The ordering is a
//! deliberate tie-break policy: salutations and courtesy phrases are
//! checked before action phrasings, and expense phrasings before income.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Result;

/// Optional currency token: symbol or short code, before or after the digits
pub(crate) const CURRENCY: &str = r"(?:[₹$]|rs\.?|inr|usd)";

/// Amount with up to two decimal places, captured
pub(crate) const AMOUNT: &str = r"(\d+(?:\.\d{1,2})?)";

/// The closed set of actions a message can be classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    AddExpense,
    AddIncome,
    CheckBalance,
    CheckSpending,
    RecentTransactions,
    SetBudget,
    Greeting,
    Help,
    Thanks,
    Unrecognized,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::AddExpense => "add_expense",
            Intent::AddIncome => "add_income",
            Intent::CheckBalance => "check_balance",
            Intent::CheckSpending => "check_spending",
            Intent::RecentTransactions => "recent_transactions",
            Intent::SetBudget => "set_budget",
            Intent::Greeting => "greeting",
            Intent::Help => "help",
            Intent::Thanks => "thanks",
            Intent::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "add_expense" => Ok(Intent::AddExpense),
            "add_income" => Ok(Intent::AddIncome),
            "check_balance" => Ok(Intent::CheckBalance),
            "check_spending" => Ok(Intent::CheckSpending),
            "recent_transactions" => Ok(Intent::RecentTransactions),
            "set_budget" => Ok(Intent::SetBudget),
            "greeting" => Ok(Intent::Greeting),
            "help" => Ok(Intent::Help),
            "thanks" => Ok(Intent::Thanks),
            "unrecognized" => Ok(Intent::Unrecognized),
            _ => Err(format!("Unknown intent: {}", s)),
        }
    }
}

/// Pattern sources for the three intents that carry capture groups; shared
/// with the entity extractor so extraction reuses the exact same groups
pub(crate) fn add_expense_patterns() -> Vec<String> {
    vec![
        format!(
            r"(?:i\s+)?(?:spent|paid|bought|purchased|expensed?)\s+{cur}?\s*{num}\s*{cur}?\s*(?:on|for|at)?\s*(.+)?",
            cur = CURRENCY,
            num = AMOUNT
        ),
        format!(
            r"(?:add|record|log)\s+(?:an?\s+)?expense\s+(?:of\s+)?{cur}?\s*{num}\s*{cur}?\s*(?:for|on)?\s*(.+)?",
            cur = CURRENCY,
            num = AMOUNT
        ),
        format!(
            r"{num}\s*{cur}?\s+(?:spent\s+)?(?:on|for|at)\s+(.+)",
            cur = CURRENCY,
            num = AMOUNT
        ),
    ]
}

pub(crate) fn add_income_patterns() -> Vec<String> {
    vec![
        format!(
            r"(?:i\s+)?(?:received|got|earned|income)\s+{cur}?\s*{num}\s*{cur}?\s*(?:from|as|for)?\s*(.+)?",
            cur = CURRENCY,
            num = AMOUNT
        ),
        format!(
            r"(?:add|record|log)\s+(?:an?\s+)?income\s+(?:of\s+)?{cur}?\s*{num}\s*{cur}?\s*(?:from|as)?\s*(.+)?",
            cur = CURRENCY,
            num = AMOUNT
        ),
        format!(r"salary\s+(?:of\s+)?{cur}?\s*{num}", cur = CURRENCY, num = AMOUNT),
    ]
}

pub(crate) fn set_budget_patterns() -> Vec<String> {
    vec![
        format!(
            r"set\s+(?:a\s+)?budget\s+(?:of\s+)?{cur}?\s*{num}\s*(?:for\s+)?(.+)?",
            cur = CURRENCY,
            num = AMOUNT
        ),
        format!(
            r"budget\s+(.+?)\s+(?:to|at)\s+{cur}?\s*{num}",
            cur = CURRENCY,
            num = AMOUNT
        ),
    ]
}

fn compile(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Ok(Regex::new(&format!("(?i){}", p))?))
        .collect()
}

fn compile_static(patterns: &[&str]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Ok(Regex::new(&format!("(?i){}", p))?))
        .collect()
}

/// Ordered first-match-wins intent classifier
pub struct IntentClassifier {
    groups: Vec<(Intent, Vec<Regex>)>,
}

impl IntentClassifier {
    pub fn new() -> Result<Self> {
        let groups = vec![
            (
                Intent::Greeting,
                compile_static(&[
                    r"^(?:hi|hello|hey|hola|greetings)[\s!]*$",
                    r"^good\s+(?:morning|afternoon|evening)[\s!]*$",
                ])?,
            ),
            (
                Intent::Help,
                compile_static(&[r"\b(?:what\s+can\s+you\s+do|help|commands?|how\s+to\s+use)\b"])?,
            ),
            (
                Intent::Thanks,
                compile_static(&[r"\b(?:thanks?|thank\s+you|thx|ty)\b"])?,
            ),
            (Intent::AddExpense, compile(&add_expense_patterns())?),
            (Intent::AddIncome, compile(&add_income_patterns())?),
            (
                Intent::CheckBalance,
                compile_static(&[
                    r"(?:what'?s?\s+)?(?:my\s+)?(?:current\s+)?balance",
                    r"how\s+much\s+(?:do\s+i\s+have|money|left)",
                    r"(?:show\s+)?(?:my\s+)?(?:account\s+)?summary",
                ])?,
            ),
            (
                Intent::CheckSpending,
                compile_static(&[
                    r"how\s+much\s+(?:did\s+i\s+)?(?:spent?|spend)",
                    r"(?:my\s+)?(?:total\s+)?(?:spending|expenses)",
                    r"(?:show\s+)?spending\s+(?:on|for|in)\s+(.+)",
                ])?,
            ),
            (
                Intent::RecentTransactions,
                compile_static(&[
                    r"(?:show\s+)?(?:my\s+)?(?:recent|last|latest)\s+(?:transactions?|expenses?)",
                    r"what\s+did\s+i\s+(?:spend|buy)\s+(?:recently|today|yesterday)",
                ])?,
            ),
            (Intent::SetBudget, compile(&set_budget_patterns())?),
        ];

        Ok(Self { groups })
    }

    /// Classify a message; no group matching means Unrecognized
    pub fn classify(&self, text: &str) -> Intent {
        for (intent, patterns) in &self.groups {
            if patterns.iter().any(|p| p.is_match(text)) {
                return *intent;
            }
        }
        Intent::Unrecognized
    }
}
