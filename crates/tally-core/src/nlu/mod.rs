//! Natural-language understanding for chat messages
//!
//! - `intent` - closed-set intent classification over ordered pattern groups
//! - `extract` - amount/description/category extraction into a ParsedCommand

mod extract;
mod intent;

pub use extract::{EntityExtractor, ParsedCommand};
pub use intent::{Intent, IntentClassifier};
