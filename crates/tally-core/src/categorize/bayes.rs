//! Multinomial naive bayes over TF-IDF n-gram features
//!
//! A small, self-contained text classifier: unigram+bigram vocabulary with
//! stop-word filtering, smoothed-idf TF-IDF weighting with L2 document
//! normalization, and a multinomial model with Laplace smoothing. The
//! fitted model is serializable so it can be cached on disk between runs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{normalize_text, TrainingExample};
use crate::error::{Error, Result};

/// Vocabulary cap; most frequent terms win
const MAX_FEATURES: usize = 5000;

/// Laplace smoothing for feature likelihoods
const SMOOTHING_ALPHA: f64 = 0.1;

/// Common English function words excluded from the vocabulary
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "can",
    "did", "do", "does", "for", "from", "had", "has", "have", "he", "her",
    "his", "i", "if", "in", "into", "is", "it", "its", "me", "my", "no",
    "not", "of", "on", "or", "our", "she", "so", "some", "such", "than",
    "that", "the", "their", "them", "then", "there", "these", "they", "this",
    "to", "was", "we", "were", "what", "when", "which", "who", "will",
    "with", "you", "your",
];

fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Normalize and tokenize into unigrams + bigrams, stop words removed
fn tokenize(text: &str) -> Vec<String> {
    let cleaned = normalize_text(text);
    let words: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|w| !is_stop_word(w))
        .collect();

    let mut tokens: Vec<String> = words.iter().map(|w| w.to_string()).collect();
    for pair in words.windows(2) {
        tokens.push(format!("{} {}", pair[0], pair[1]));
    }
    tokens
}

/// A fitted classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BayesModel {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    /// Per-class log feature likelihoods, indexed [class][feature]
    feature_log_prob: Vec<Vec<f64>>,
}

impl BayesModel {
    /// Fit a model from labeled examples
    pub fn fit(examples: &[TrainingExample]) -> Result<Self> {
        if examples.is_empty() {
            return Err(Error::Training("no training examples".into()));
        }

        let docs: Vec<(Vec<String>, &str)> = examples
            .iter()
            .map(|ex| (tokenize(&ex.text), ex.label.as_str()))
            .collect();
        let n_docs = docs.len() as f64;

        // Term statistics: corpus frequency (for the feature cap) and
        // document frequency (for idf)
        let mut corpus_tf: HashMap<&str, u64> = HashMap::new();
        let mut doc_freq: HashMap<&str, u64> = HashMap::new();
        for (tokens, _) in &docs {
            let mut seen: Vec<&str> = Vec::new();
            for token in tokens {
                *corpus_tf.entry(token.as_str()).or_insert(0) += 1;
                if !seen.contains(&token.as_str()) {
                    seen.push(token.as_str());
                    *doc_freq.entry(token.as_str()).or_insert(0) += 1;
                }
            }
        }

        // Keep the most frequent terms; ties broken alphabetically so the
        // fit is deterministic
        let mut terms: Vec<(&str, u64)> = corpus_tf.into_iter().collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        terms.truncate(MAX_FEATURES);

        let mut vocabulary = HashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (index, (term, _)) in terms.iter().enumerate() {
            vocabulary.insert(term.to_string(), index);
            let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
            idf.push(((1.0 + n_docs) / (1.0 + df)).ln() + 1.0);
        }

        let mut classes: Vec<String> = Vec::new();
        for (_, label) in &docs {
            if !classes.iter().any(|c| c == label) {
                classes.push(label.to_string());
            }
        }
        classes.sort();

        // Accumulate per-class TF-IDF feature mass
        let mut class_doc_counts = vec![0u64; classes.len()];
        let mut feature_counts = vec![vec![0.0f64; vocabulary.len()]; classes.len()];
        for (tokens, label) in &docs {
            let class_index = classes
                .iter()
                .position(|c| c == label)
                .ok_or_else(|| Error::Training(format!("unknown class: {}", label)))?;
            class_doc_counts[class_index] += 1;

            for (feature, weight) in vectorize_tokens(tokens, &vocabulary, &idf) {
                feature_counts[class_index][feature] += weight;
            }
        }

        let vocab_len = vocabulary.len() as f64;
        let class_log_prior = class_doc_counts
            .iter()
            .map(|&count| (count as f64 / n_docs).ln())
            .collect();
        let feature_log_prob = feature_counts
            .iter()
            .map(|counts| {
                let total: f64 = counts.iter().sum();
                counts
                    .iter()
                    .map(|&c| ((c + SMOOTHING_ALPHA) / (total + SMOOTHING_ALPHA * vocab_len)).ln())
                    .collect()
            })
            .collect();

        Ok(Self {
            vocabulary,
            idf,
            classes,
            class_log_prior,
            feature_log_prob,
        })
    }

    /// Posterior probabilities for every class, sorted descending
    pub fn predict_proba(&self, text: &str) -> Vec<(String, f64)> {
        let tokens = tokenize(text);
        let features = vectorize_tokens(&tokens, &self.vocabulary, &self.idf);

        // Joint log likelihood per class; an all-zero vector degenerates to
        // the class priors, which is the desired behavior for unseen text
        let mut joint = self.class_log_prior.clone();
        for (feature, weight) in &features {
            for (class_index, log_probs) in self.feature_log_prob.iter().enumerate() {
                joint[class_index] += weight * log_probs[*feature];
            }
        }

        // Softmax via log-sum-exp
        let max = joint.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let log_sum = max + joint.iter().map(|j| (j - max).exp()).sum::<f64>().ln();

        let mut posterior: Vec<(String, f64)> = self
            .classes
            .iter()
            .zip(joint.iter())
            .map(|(class, j)| (class.clone(), (j - log_sum).exp()))
            .collect();
        posterior.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        posterior
    }

    /// Best class and its posterior probability
    pub fn predict(&self, text: &str) -> Option<(String, f64)> {
        self.predict_proba(text).into_iter().next()
    }
}

/// Sparse L2-normalized TF-IDF vector for a token list
fn vectorize_tokens(
    tokens: &[String],
    vocabulary: &HashMap<String, usize>,
    idf: &[f64],
) -> Vec<(usize, f64)> {
    let mut tf: HashMap<usize, f64> = HashMap::new();
    for token in tokens {
        if let Some(&index) = vocabulary.get(token) {
            *tf.entry(index).or_insert(0.0) += 1.0;
        }
    }

    let mut weighted: Vec<(usize, f64)> = tf
        .into_iter()
        .map(|(index, count)| (index, count * idf[index]))
        .collect();

    let norm: f64 = weighted.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, w) in weighted.iter_mut() {
            *w /= norm;
        }
    }
    weighted
}
