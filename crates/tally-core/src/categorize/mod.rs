//! Transaction categorization
//!
//! Two-stage pipeline: a deterministic keyword override over the fixed
//! category table (confidence 0.95), then a naive-bayes fallback trained
//! on a synthetic corpus generated from the same table. The fitted model
//! is shared read-mostly state: `retrain` builds a replacement off to the
//! side and swaps the `Arc` under a write lock, so readers always see a
//! complete model.

mod bayes;
pub mod keywords;

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
pub use bayes::BayesModel;
pub use keywords::{synthetic_corpus, CATEGORY_KEYWORDS};

/// Label used when no category can be determined
pub const FALLBACK_CATEGORY: &str = "Other";

/// Confidence reported for deterministic keyword hits
pub const KEYWORD_CONFIDENCE: f64 = 0.95;

/// A labeled training text for the statistical fallback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub text: String,
    pub label: String,
}

/// A category prediction with its confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: String,
    pub confidence: f64,
}

impl Classification {
    fn fallback() -> Self {
        Self {
            category: FALLBACK_CATEGORY.to_string(),
            confidence: 0.0,
        }
    }
}

/// Lowercase, strip non-alphanumerics to spaces, collapse whitespace
pub(crate) fn normalize_text(text: &str) -> String {
    let lowered: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First category whose keyword list contains a substring of the text
fn keyword_match(normalized: &str) -> Option<&'static str> {
    for (category, kws) in CATEGORY_KEYWORDS {
        for keyword in *kws {
            if normalized.contains(keyword) {
                return Some(category);
            }
        }
    }
    None
}

/// Keyword-override + statistical-fallback categorizer
pub struct Categorizer {
    model: RwLock<Arc<BayesModel>>,
    cache_path: Option<PathBuf>,
}

impl Categorizer {
    /// Train a fresh in-memory categorizer from the synthetic corpus
    pub fn new() -> Result<Self> {
        let model = BayesModel::fit(&synthetic_corpus())?;
        Ok(Self {
            model: RwLock::new(Arc::new(model)),
            cache_path: None,
        })
    }

    /// Categorizer backed by a JSON model cache at `path`
    ///
    /// Loads the cached model when present and readable; otherwise trains
    /// from the synthetic corpus and writes the cache.
    pub fn with_cache(path: PathBuf) -> Result<Self> {
        if let Ok(contents) = std::fs::read_to_string(&path) {
            match serde_json::from_str::<BayesModel>(&contents) {
                Ok(model) => {
                    debug!(path = %path.display(), "Loaded cached categorizer model");
                    return Ok(Self {
                        model: RwLock::new(Arc::new(model)),
                        cache_path: Some(path),
                    });
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Ignoring corrupt model cache");
                }
            }
        }

        let model = BayesModel::fit(&synthetic_corpus())?;
        let categorizer = Self {
            model: RwLock::new(Arc::new(model)),
            cache_path: Some(path),
        };
        categorizer.save_cache();
        Ok(categorizer)
    }

    /// Categorizer caching its model in the platform data directory
    pub fn from_data_dir() -> Result<Self> {
        let dir = dirs::data_dir()
            .map(|d| d.join("tally"))
            .ok_or_else(|| Error::Training("no platform data directory".into()))?;
        std::fs::create_dir_all(&dir)?;
        Self::with_cache(dir.join("categorizer_model.json"))
    }

    /// Predict the category for a transaction description
    ///
    /// Never fails: blank input and classifier errors both produce the
    /// ("Other", 0.0) fallback.
    pub fn predict(&self, description: &str) -> Classification {
        if description.trim().is_empty() {
            return Classification::fallback();
        }

        let cleaned = normalize_text(description);

        if let Some(category) = keyword_match(&cleaned) {
            return Classification {
                category: category.to_string(),
                confidence: KEYWORD_CONFIDENCE,
            };
        }

        let model = match self.model.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(_) => return Classification::fallback(),
        };
        match model.predict(&cleaned) {
            Some((category, confidence)) => Classification {
                category,
                confidence,
            },
            None => Classification::fallback(),
        }
    }

    /// The n most probable categories with their posterior values
    pub fn top_predictions(&self, description: &str, n: usize) -> Vec<(String, f64)> {
        if description.trim().is_empty() {
            return vec![(FALLBACK_CATEGORY.to_string(), 0.0)];
        }

        let cleaned = normalize_text(description);
        let model = match self.model.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(_) => return vec![(FALLBACK_CATEGORY.to_string(), 0.0)],
        };

        let mut probs = model.predict_proba(&cleaned);
        probs.truncate(n);
        if probs.is_empty() {
            return vec![(FALLBACK_CATEGORY.to_string(), 0.0)];
        }
        probs
    }

    /// Refit over the base corpus plus caller-supplied (text, label) pairs
    ///
    /// The replacement model is built completely before the swap, so
    /// concurrent predictions observe either the old or the new model.
    pub fn retrain(&self, extra: &[(String, String)]) -> Result<()> {
        let mut examples = synthetic_corpus();
        examples.extend(extra.iter().map(|(text, label)| TrainingExample {
            text: text.clone(),
            label: label.clone(),
        }));

        let model = Arc::new(BayesModel::fit(&examples)?);

        {
            let mut guard = self
                .model
                .write()
                .map_err(|_| Error::Training("model lock poisoned".into()))?;
            *guard = model;
        }
        self.save_cache();

        debug!(extra = extra.len(), "Categorizer retrained");
        Ok(())
    }

    fn save_cache(&self) {
        let Some(path) = &self.cache_path else {
            return;
        };
        let model = match self.model.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(_) => return,
        };
        match serde_json::to_string(&*model) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    warn!(path = %path.display(), error = %e, "Failed to write model cache");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize model cache"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_hits_return_fixed_confidence() {
        let categorizer = Categorizer::new().unwrap();
        // Every keyword in the table is a deterministic hit. Keywords shared
        // between categories (or containing an earlier category's keyword,
        // like "gas bill") resolve to the first table entry, so the expected
        // label is the first category with any substring match.
        for (_, keywords) in CATEGORY_KEYWORDS {
            for keyword in *keywords {
                let expected = CATEGORY_KEYWORDS
                    .iter()
                    .find(|(_, kws)| kws.iter().any(|k| keyword.contains(k)))
                    .map(|(c, _)| *c)
                    .unwrap();

                let result = categorizer.predict(keyword);
                assert_eq!(
                    result.category, expected,
                    "keyword {:?} predicted {:?}",
                    keyword, result.category
                );
                assert!((result.confidence - KEYWORD_CONFIDENCE).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn test_unambiguous_keywords_round_trip() {
        let categorizer = Categorizer::new().unwrap();
        for (keyword, category) in [
            ("groceries", "Food & Dining"),
            ("uber", "Transport"),
            ("netflix", "Entertainment"),
            ("electricity", "Utilities"),
            ("laptop", "Shopping"),
            ("pharmacy", "Healthcare"),
            ("tuition", "Education"),
            ("savings", "Savings"),
            ("salary", "Salary"),
            ("freelance", "Freelance"),
            ("dividend", "Investment"),
        ] {
            let result = categorizer.predict(keyword);
            assert_eq!(result.category, category);
            assert!((result.confidence - KEYWORD_CONFIDENCE).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_blank_input() {
        let categorizer = Categorizer::new().unwrap();
        assert_eq!(categorizer.predict(""), Classification::fallback());
        assert_eq!(categorizer.predict("   "), Classification::fallback());
    }

    #[test]
    fn test_keyword_match_inside_sentence() {
        let categorizer = Categorizer::new().unwrap();
        let result = categorizer.predict("weekly groceries at the market");
        assert_eq!(result.category, "Food & Dining");
        assert!((result.confidence - KEYWORD_CONFIDENCE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_table_order_breaks_ties() {
        let categorizer = Categorizer::new().unwrap();
        // "gift" appears under both Shopping and Gift; Shopping comes first
        let result = categorizer.predict("gift");
        assert_eq!(result.category, "Shopping");
    }

    #[test]
    fn test_statistical_fallback_engages() {
        let categorizer = Categorizer::new().unwrap();
        // "cappuccino" is not in any keyword list, so the model answers;
        // confidence must be a posterior, not the keyword constant
        let result = categorizer.predict("cappuccino");
        assert!(result.confidence < KEYWORD_CONFIDENCE || result.confidence == 0.0);
    }

    #[test]
    fn test_top_predictions() {
        let categorizer = Categorizer::new().unwrap();
        let top = categorizer.top_predictions("cappuccino venti", 3);
        assert!(top.len() <= 3 && !top.is_empty());
        for pair in top.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }

        assert_eq!(
            categorizer.top_predictions("", 3),
            vec![(FALLBACK_CATEGORY.to_string(), 0.0)]
        );
    }

    #[test]
    fn test_retrain_swaps_model() {
        let categorizer = Categorizer::new().unwrap();
        let extra: Vec<(String, String)> = (0..20)
            .map(|_| ("cappuccino".to_string(), "Food & Dining".to_string()))
            .collect();
        categorizer.retrain(&extra).unwrap();

        let result = categorizer.predict("cappuccino");
        assert_eq!(result.category, "Food & Dining");
    }

    #[test]
    fn test_cache_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let first = Categorizer::with_cache(path.clone()).unwrap();
        assert!(path.exists());
        // A non-keyword input so the answer comes from the cached model
        let expected = first.predict("cappuccino");

        // Second instance loads the cache instead of retraining
        let second = Categorizer::with_cache(path).unwrap();
        assert_eq!(second.predict("cappuccino"), expected);
    }

    #[test]
    fn test_corrupt_cache_retrains() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "not json").unwrap();

        let categorizer = Categorizer::with_cache(path).unwrap();
        assert_eq!(categorizer.predict("groceries").category, "Food & Dining");
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("Spent ₹500 on GROCERIES!"), "spent 500 on groceries");
        assert_eq!(normalize_text("  a  b  "), "a b");
    }
}
