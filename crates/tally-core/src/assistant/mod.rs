//! Conversational assistant
//!
//! One message in, one reply out. The dispatcher tries the remote
//! generative path first when the user has a credential configured, and
//! silently degrades to the deterministic pipeline (intent classifier →
//! entity extractor → handler) on any remote failure. Both paths route
//! add-expense/add-income through the same handlers, so they always
//! produce identical persisted effects.

use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::ai::{extract_command, RemoteBackend, RemoteClient};
use crate::categorize::Categorizer;
use crate::db::Database;
use crate::error::Result;
use crate::models::{Category, TransactionKind};
use crate::nlu::{EntityExtractor, Intent, IntentClassifier, ParsedCommand};

/// Settings key holding the per-user remote assistant credential
pub const REMOTE_KEY_SETTING: &str = "gemini_api_key";

/// Display currency for formatted replies
const CURRENCY_SYMBOL: &str = "₹";

const GREETINGS: &[&str] = &[
    "Hello! 👋 I'm your expense assistant. How can I help you today?",
    "Hi there! 💰 I'm here to help manage your finances. What would you like to do?",
    "Hey! 🤖 Ready to help with your expenses. Just tell me what you need!",
];

const FALLBACK_SUGGESTIONS: &[&str] = &[
    "Try saying 'Spent ₹500 on groceries'",
    "Try 'What's my balance?'",
    "Try 'Show my recent expenses'",
];

/// What a reply did, for callers that branch on the outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Greeting,
    Help,
    Thanks,
    ExpenseAdded,
    IncomeAdded,
    BalanceChecked,
    SpendingChecked,
    TransactionsListed,
    BudgetSet,
    NeedCategory,
    CategoryNotFound,
    Chat,
    Fallback,
    Error,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Greeting => "greeting",
            Action::Help => "help",
            Action::Thanks => "thanks",
            Action::ExpenseAdded => "expense_added",
            Action::IncomeAdded => "income_added",
            Action::BalanceChecked => "balance_checked",
            Action::SpendingChecked => "spending_checked",
            Action::TransactionsListed => "transactions_listed",
            Action::BudgetSet => "budget_set",
            Action::NeedCategory => "need_category",
            Action::CategoryNotFound => "category_not_found",
            Action::Chat => "chat",
            Action::Fallback => "fallback",
            Action::Error => "error",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The assistant's answer to one message
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub response: String,
    pub action: Action,
    pub data: Option<serde_json::Value>,
}

impl Reply {
    fn plain(response: impl Into<String>, action: Action) -> Self {
        Self {
            response: response.into(),
            action,
            data: None,
        }
    }
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Deterministic template pick keyed off the message bytes
fn pick<'a>(templates: &'a [&'a str], message: &str) -> &'a str {
    let sum: usize = message.bytes().map(|b| b as usize).sum();
    templates[sum % templates.len()]
}

/// Message dispatcher over storage, NLU, categorizer and optional remote
pub struct Assistant {
    db: Database,
    categorizer: Arc<Categorizer>,
    intents: IntentClassifier,
    extractor: EntityExtractor,
    /// Injected remote client; takes precedence over the per-user setting
    remote: Option<RemoteClient>,
}

impl Assistant {
    pub fn new(db: Database, categorizer: Arc<Categorizer>) -> Result<Self> {
        Ok(Self {
            db,
            categorizer,
            intents: IntentClassifier::new()?,
            extractor: EntityExtractor::new()?,
            remote: None,
        })
    }

    /// Use a fixed remote client instead of resolving one per user
    pub fn with_remote(mut self, client: RemoteClient) -> Self {
        self.remote = Some(client);
        self
    }

    /// Process one user message into a reply
    ///
    /// Never fails on remote trouble: any error on the remote path is
    /// logged and the deterministic path answers instead.
    pub async fn process_message(&self, message: &str, user_id: i64) -> Result<Reply> {
        let message = message.trim().to_lowercase();
        if message.is_empty() {
            return Ok(self.fallback_reply(&message));
        }

        if let Some(client) = self.remote_client(user_id)? {
            match self.process_remote(&client, &message, user_id).await {
                Ok(reply) => return Ok(reply),
                Err(e) => {
                    debug!(error = %e, "Remote assistant unavailable, using deterministic path");
                }
            }
        }

        self.process_deterministic(&message, user_id)
    }

    /// Single-line combined alert/top-category summary
    pub fn quick_insights(&self, user_id: i64) -> Result<String> {
        let today = chrono::Local::now().date_naive();
        let summary = self
            .db
            .get_summary(user_id, Some(month_start(today)), None)?;
        let breakdown = self.db.get_category_breakdown(
            user_id,
            Some(month_start(today)),
            None,
            TransactionKind::Expense,
        )?;

        let mut insights = Vec::new();

        if summary.balance < 0.0 {
            insights.push("⚠️ Your expenses exceed income this month!".to_string());
        } else if summary.income > 0.0 && summary.expense / summary.income > 0.8 {
            insights.push("📊 You've spent 80%+ of your income this month.".to_string());
        }

        if let Some(top) = breakdown.first() {
            insights.push(format!(
                "🏆 Top spending: {} {} ({}{:.0})",
                top.icon, top.name, CURRENCY_SYMBOL, top.total
            ));
        }

        if insights.is_empty() {
            return Ok("💰 All looks good! Keep tracking your expenses.".to_string());
        }
        Ok(insights.join(" | "))
    }

    // ---------------------------------------------------------------------
    // Remote path
    // ---------------------------------------------------------------------

    fn remote_client(&self, user_id: i64) -> Result<Option<RemoteClient>> {
        if let Some(client) = &self.remote {
            return Ok(Some(client.clone()));
        }
        let key = self.db.get_setting(REMOTE_KEY_SETTING, user_id)?;
        Ok(key
            .filter(|k| !k.is_empty())
            .map(|k| RemoteClient::gemini(&k)))
    }

    async fn process_remote(
        &self,
        client: &RemoteClient,
        message: &str,
        user_id: i64,
    ) -> Result<Reply> {
        let prompt = self.build_prompt(message, user_id)?;
        let text = client.generate(&prompt).await?;

        if let Some(command) = extract_command(&text) {
            if command.amount > 0.0 {
                let description = command.description.as_deref();
                match command.action.as_str() {
                    "add_expense" => return self.add_expense(command.amount, description, user_id),
                    "add_income" => return self.add_income(command.amount, description, user_id),
                    other => {
                        debug!(action = other, "Ignoring unknown remote action");
                    }
                }
            }
        }

        Ok(Reply::plain(text, Action::Chat))
    }

    fn build_prompt(&self, message: &str, user_id: i64) -> Result<String> {
        let today = chrono::Local::now().date_naive();
        let summary = self
            .db
            .get_summary(user_id, Some(month_start(today)), None)?;
        let categories = self.db.get_categories(user_id, None)?;
        let category_list = categories
            .iter()
            .map(|c| format!("{} ({})", c.name, c.kind))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!(
            "You are an expense assistant for a personal finance app.\n\
             Current Month: {month}\n\
             User Current Balance: {cur}{balance:.2}\n\
             Income this month: {cur}{income:.2}\n\
             Expenses this month: {cur}{expense:.2}\n\
             Available Categories: {categories}\n\
             \n\
             Tasks:\n\
             1. If the user wants to add an expense/income, extract \"amount\", \"description\", and \"category\".\n\
             2. If the user asks a question about their spending, answer based on the summary provided.\n\
             3. Keep responses helpful, concise, and friendly.\n\
             4. If adding a transaction, return a JSON block at the end with keys: \"action\" (add_expense/add_income), \"amount\", \"description\", \"category\".\n\
             \n\
             User Message: \"{message}\"",
            month = today.format("%B %Y"),
            cur = CURRENCY_SYMBOL,
            balance = summary.balance,
            income = summary.income,
            expense = summary.expense,
            categories = category_list,
            message = message,
        ))
    }

    // ---------------------------------------------------------------------
    // Deterministic path
    // ---------------------------------------------------------------------

    fn process_deterministic(&self, message: &str, user_id: i64) -> Result<Reply> {
        let intent = self.intents.classify(message);
        debug!(intent = %intent, "Classified message");

        match intent {
            Intent::Greeting => Ok(Reply::plain(pick(GREETINGS, message), Action::Greeting)),
            Intent::Help => Ok(self.help_reply()),
            Intent::Thanks => Ok(Reply::plain(
                "You're welcome! 😊 Let me know if you need anything else!",
                Action::Thanks,
            )),
            Intent::CheckBalance => self.check_balance(user_id),
            Intent::CheckSpending => self.check_spending(user_id),
            Intent::RecentTransactions => self.recent_transactions(user_id),
            Intent::AddExpense | Intent::AddIncome | Intent::SetBudget | Intent::Unrecognized => {
                let command = self.extractor.extract(message, intent);
                self.dispatch_command(command, message, user_id)
            }
        }
    }

    fn dispatch_command(
        &self,
        command: ParsedCommand,
        message: &str,
        user_id: i64,
    ) -> Result<Reply> {
        match (command.intent, command.amount) {
            (Intent::AddExpense, Some(amount)) if amount > 0.0 => {
                self.add_expense(amount, command.description.as_deref(), user_id)
            }
            (Intent::AddIncome, Some(amount)) if amount > 0.0 => {
                self.add_income(amount, command.description.as_deref(), user_id)
            }
            (Intent::SetBudget, Some(amount)) if amount > 0.0 => {
                self.set_budget(amount, command.category.as_deref(), user_id)
            }
            _ => Ok(self.fallback_reply(message)),
        }
    }

    fn add_expense(&self, amount: f64, description: Option<&str>, user_id: i64) -> Result<Reply> {
        let description = description.unwrap_or("expense");
        let prediction = self.categorizer.predict(description);
        debug!(
            category = %prediction.category,
            confidence = prediction.confidence,
            "Categorized expense"
        );

        let Some(category) =
            self.expense_category(&prediction.category, user_id)?
        else {
            warn!(user_id, "No expense category available");
            return Ok(Reply::plain(
                "❌ Sorry, I couldn't find an expense category. Please try again.",
                Action::Error,
            ));
        };

        let today = chrono::Local::now().date_naive();
        let display = title_case(description);
        let id = self.db.add_transaction(
            amount,
            Some(&display),
            category.id,
            TransactionKind::Expense,
            today,
            user_id,
        )?;

        let response = format!(
            "✅ Expense added!\n\n\
             💸 Amount: {cur}{amount:.2}\n\
             📝 Description: {display}\n\
             🏷️ Category: {icon} {name}\n\
             📅 Date: {date}\n\n\
             I categorized this as {name} based on your description.",
            cur = CURRENCY_SYMBOL,
            amount = amount,
            display = display,
            icon = category.icon,
            name = category.name,
            date = today.format("%d %b %Y"),
        );

        Ok(Reply {
            response,
            action: Action::ExpenseAdded,
            data: Some(json!({
                "id": id,
                "amount": amount,
                "category": category.name,
                "description": display,
            })),
        })
    }

    fn add_income(&self, amount: f64, description: Option<&str>, user_id: i64) -> Result<Reply> {
        let description = description.unwrap_or("income");
        let prediction = self.categorizer.predict(description);

        let Some(category) =
            self.income_category(&prediction.category, description, user_id)?
        else {
            warn!(user_id, "No income category available");
            return Ok(Reply::plain(
                "❌ Sorry, I couldn't find an income category. Please try again.",
                Action::Error,
            ));
        };

        let today = chrono::Local::now().date_naive();
        let display = title_case(description);
        let id = self.db.add_transaction(
            amount,
            Some(&display),
            category.id,
            TransactionKind::Income,
            today,
            user_id,
        )?;

        let response = format!(
            "✅ Income added!\n\n\
             💵 Amount: {cur}{amount:.2}\n\
             📝 Description: {display}\n\
             🏷️ Category: {icon} {name}\n\
             📅 Date: {date}\n\n\
             Great! Your income has been recorded. 🎉",
            cur = CURRENCY_SYMBOL,
            amount = amount,
            display = display,
            icon = category.icon,
            name = category.name,
            date = today.format("%d %b %Y"),
        );

        Ok(Reply {
            response,
            action: Action::IncomeAdded,
            data: Some(json!({
                "id": id,
                "amount": amount,
                "category": category.name,
                "description": display,
            })),
        })
    }

    /// Predicted label if it names an expense category, else an
    /// "Other"-style category, else the first expense category
    fn expense_category(&self, label: &str, user_id: i64) -> Result<Option<Category>> {
        if let Some(category) = self.db.get_category_by_name(label, user_id)? {
            if category.kind == TransactionKind::Expense {
                return Ok(Some(category));
            }
        }
        let categories = self
            .db
            .get_categories(user_id, Some(TransactionKind::Expense))?;
        Ok(categories
            .iter()
            .find(|c| c.name.contains("Other"))
            .or_else(|| categories.first())
            .cloned())
    }

    /// Predicted label if it names an income category; otherwise prefer a
    /// category literally named "Salary" when the description mentions
    /// salary, else the first income category
    fn income_category(
        &self,
        label: &str,
        description: &str,
        user_id: i64,
    ) -> Result<Option<Category>> {
        if let Some(category) = self.db.get_category_by_name(label, user_id)? {
            if category.kind == TransactionKind::Income {
                return Ok(Some(category));
            }
        }
        let categories = self
            .db
            .get_categories(user_id, Some(TransactionKind::Income))?;
        if description.to_lowercase().contains("salary") {
            return Ok(categories
                .iter()
                .find(|c| c.name.contains("Salary"))
                .or_else(|| categories.first())
                .cloned());
        }
        Ok(categories.first().cloned())
    }

    fn check_balance(&self, user_id: i64) -> Result<Reply> {
        let today = chrono::Local::now().date_naive();
        let summary = self
            .db
            .get_summary(user_id, Some(month_start(today)), None)?;
        let overall = self.db.get_summary(user_id, None, None)?;

        let status = if summary.balance >= 0.0 { "🟢" } else { "🔴" };
        let closing = if summary.balance >= 0.0 {
            "Great job keeping your balance positive! 🎉"
        } else {
            "Your expenses exceed your income this month. Consider reviewing your spending. 💡"
        };

        let response = format!(
            "📊 Your Financial Summary\n\n\
             This Month ({month}):\n\
             {status} Balance: {cur}{balance:.2}\n\
             💵 Income: {cur}{income:.2}\n\
             💸 Expenses: {cur}{expense:.2}\n\n\
             All Time:\n\
             💰 Total Balance: {cur}{total:.2}\n\n\
             {closing}",
            month = today.format("%B %Y"),
            status = status,
            cur = CURRENCY_SYMBOL,
            balance = summary.balance,
            income = summary.income,
            expense = summary.expense,
            total = overall.balance,
            closing = closing,
        );

        Ok(Reply {
            response,
            action: Action::BalanceChecked,
            data: Some(serde_json::to_value(&summary)?),
        })
    }

    fn check_spending(&self, user_id: i64) -> Result<Reply> {
        let today = chrono::Local::now().date_naive();
        let breakdown = self.db.get_category_breakdown(
            user_id,
            Some(month_start(today)),
            None,
            TransactionKind::Expense,
        )?;

        if breakdown.is_empty() {
            return Ok(Reply::plain(
                "📊 You haven't recorded any expenses this month yet. Start by telling me what you spent!",
                Action::SpendingChecked,
            ));
        }

        let total: f64 = breakdown.iter().map(|c| c.total).sum();
        let lines = breakdown
            .iter()
            .take(5)
            .map(|c| {
                let share = if total > 0.0 { c.total / total * 100.0 } else { 0.0 };
                format!(
                    "  {} {}: {}{:.2} ({:.1}%)",
                    c.icon, c.name, CURRENCY_SYMBOL, c.total, share
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let response = format!(
            "📊 Your Spending This Month\n\n\
             💸 Total Spent: {cur}{total:.2}\n\n\
             Top Categories:\n{lines}\n\n\
             💡 Tip: Your biggest expense is {top}. Consider if you can reduce spending there!",
            cur = CURRENCY_SYMBOL,
            total = total,
            lines = lines,
            top = breakdown[0].name,
        );

        Ok(Reply {
            response,
            action: Action::SpendingChecked,
            data: Some(json!({ "total": total, "breakdown": breakdown })),
        })
    }

    fn recent_transactions(&self, user_id: i64) -> Result<Reply> {
        let transactions = self
            .db
            .get_transactions(user_id, None, None, None, None, Some(5))?;

        if transactions.is_empty() {
            return Ok(Reply::plain(
                "📝 No transactions recorded yet. Start by telling me about your expenses!",
                Action::TransactionsListed,
            ));
        }

        let lines = transactions
            .iter()
            .map(|t| {
                let (prefix, sign) = match t.kind {
                    TransactionKind::Expense => ("💸", "-"),
                    TransactionKind::Income => ("💵", "+"),
                };
                format!(
                    "  {} {}: {}{}{:.2}",
                    prefix,
                    t.description.as_deref().unwrap_or("No description"),
                    sign,
                    CURRENCY_SYMBOL,
                    t.amount
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let response = format!(
            "📋 Your Recent Transactions\n\n{}\n\n\
             Would you like to add a new transaction or see your balance?",
            lines
        );

        Ok(Reply {
            response,
            action: Action::TransactionsListed,
            data: Some(serde_json::to_value(&transactions)?),
        })
    }

    /// Budget upsert with substring category matching
    ///
    /// The first category whose name contains the extracted text wins, in
    /// listing order; overlapping names resolve to the earlier entry.
    fn set_budget(&self, amount: f64, category_text: Option<&str>, user_id: i64) -> Result<Reply> {
        let Some(category_text) = category_text else {
            return Ok(Reply::plain(
                "💳 Which category would you like to set a budget for? (e.g., 'Budget Food to ₹5000')",
                Action::NeedCategory,
            ));
        };

        let needle = category_text.to_lowercase();
        let categories = self
            .db
            .get_categories(user_id, Some(TransactionKind::Expense))?;
        let Some(category) = categories
            .iter()
            .find(|c| c.name.to_lowercase().contains(&needle))
        else {
            let names = categories
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Ok(Reply::plain(
                format!(
                    "❓ I couldn't find a category matching '{}'. Try: {}",
                    category_text, names
                ),
                Action::CategoryNotFound,
            ));
        };

        self.db.set_budget(category.id, user_id, amount)?;

        let response = format!(
            "✅ Budget set!\n\n\
             {icon} {name}\n\
             💳 Monthly Limit: {cur}{amount:.2}\n\n\
             I'll alert you when you're approaching or exceeding this budget! 📢",
            icon = category.icon,
            name = category.name,
            cur = CURRENCY_SYMBOL,
            amount = amount,
        );

        Ok(Reply {
            response,
            action: Action::BudgetSet,
            data: Some(json!({ "category": category.name, "amount": amount })),
        })
    }

    fn help_reply(&self) -> Reply {
        Reply::plain(
            "🤖 I'm your expense assistant!\n\n\
             Here's what I can do for you:\n\n\
             💸 Add Expenses:\n\
             • \"Spent ₹500 on groceries\"\n\
             • \"Paid 200 for coffee\"\n\
             • \"Bought lunch for ₹150\"\n\n\
             💵 Add Income:\n\
             • \"Received salary of ₹50000\"\n\
             • \"Got ₹5000 from freelance\"\n\n\
             📊 Check Finances:\n\
             • \"What's my balance?\"\n\
             • \"Show my spending\"\n\
             • \"Recent transactions\"\n\n\
             💳 Set Budgets:\n\
             • \"Budget food to ₹10000\"\n\n\
             Just type naturally, and I'll understand! 🎯",
            Action::Help,
        )
    }

    fn fallback_reply(&self, message: &str) -> Reply {
        Reply::plain(
            format!(
                "🤔 I'm not sure I understood that correctly.\n\n{}\n\nType 'help' to see all the things I can do! 💡",
                pick(FALLBACK_SUGGESTIONS, message)
            ),
            Action::Fallback,
        )
    }
}
