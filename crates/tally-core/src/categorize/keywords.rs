//! Fixed category keyword table and synthetic training corpus
//!
//! The table drives two things: the deterministic keyword override in the
//! categorizer, and the synthetic corpus the statistical fallback is
//! trained on. Table order is the tie-break when a description matches
//! keywords from more than one category.

use super::TrainingExample;

/// Category → keyword lists, in priority order
pub const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Food & Dining",
        &[
            "restaurant", "pizza", "burger", "coffee", "cafe", "lunch", "dinner",
            "breakfast", "groceries", "supermarket", "food", "meal", "snack",
            "bakery", "swiggy", "zomato", "ubereats", "doordash", "mcdonalds",
            "starbucks", "dominos", "kfc", "subway", "tea", "juice", "ice cream",
            "food delivery", "takeout", "dine", "eating out", "fast food",
        ],
    ),
    (
        "Transport",
        &[
            "uber", "lyft", "ola", "taxi", "cab", "bus", "train", "metro",
            "fuel", "petrol", "gas", "diesel", "parking", "toll", "car",
            "bike", "motorcycle", "airline", "flight", "airport", "travel",
            "commute", "ride", "transport", "auto", "rickshaw", "fare",
        ],
    ),
    (
        "Entertainment",
        &[
            "movie", "cinema", "netflix", "spotify", "amazon prime", "disney",
            "hulu", "youtube", "gaming", "games", "concert", "show", "party",
            "club", "bar", "pub", "theatre", "music", "books", "magazine",
            "subscription", "streaming", "fun", "leisure", "hobby",
        ],
    ),
    (
        "Utilities",
        &[
            "electricity", "electric bill", "water bill", "gas bill", "internet",
            "wifi", "broadband", "phone bill", "mobile recharge", "cable",
            "utility", "rent", "housing", "maintenance", "repair", "plumber",
            "electrician", "home", "apartment", "heating", "cooling",
        ],
    ),
    (
        "Shopping",
        &[
            "amazon", "flipkart", "walmart", "target", "mall", "clothes",
            "shoes", "electronics", "gadget", "phone", "laptop", "furniture",
            "home decor", "appliance", "gift", "present", "shopping", "store",
            "retail", "online shopping", "fashion", "accessories", "jewelry",
        ],
    ),
    (
        "Healthcare",
        &[
            "hospital", "doctor", "clinic", "medicine", "pharmacy", "medical",
            "health", "dental", "dentist", "eye", "optician", "glasses",
            "prescription", "therapy", "gym", "fitness", "workout", "yoga",
            "insurance", "health insurance", "checkup", "lab", "test",
        ],
    ),
    (
        "Education",
        &[
            "school", "college", "university", "course", "tuition", "books",
            "textbook", "udemy", "coursera", "learning", "training", "workshop",
            "seminar", "certification", "exam", "study", "education", "class",
            "tutorial", "online course", "degree", "diploma",
        ],
    ),
    (
        "Savings",
        &[
            "savings", "investment", "mutual fund", "stock", "fixed deposit",
            "fd", "rd", "recurring deposit", "retirement", "pension", "emi",
            "loan payment", "sip", "bonds", "gold", "crypto", "bitcoin",
        ],
    ),
    (
        "Salary",
        &[
            "salary", "paycheck", "wages", "income", "pay", "compensation",
            "bonus", "commission", "earnings",
        ],
    ),
    (
        "Freelance",
        &[
            "freelance", "consulting", "contract", "project payment", "gig",
            "side hustle", "client payment", "invoice", "hourly",
        ],
    ),
    (
        "Investment",
        &[
            "dividend", "interest", "returns", "capital gains", "profit",
            "investment income", "rental income", "passive income",
        ],
    ),
    (
        "Gift",
        &[
            "gift", "present", "birthday money", "cash gift", "received",
            "wedding gift", "bonus gift",
        ],
    ),
];

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Expand the keyword table into the synthetic training corpus
///
/// Each keyword yields six paraphrases so the statistical fallback sees the
/// term in several surface forms. Pure and deterministic: the same table
/// always produces the same corpus.
pub fn synthetic_corpus() -> Vec<TrainingExample> {
    let mut examples = Vec::new();
    for (category, keywords) in CATEGORY_KEYWORDS {
        for keyword in *keywords {
            let variants = [
                keyword.to_string(),
                keyword.to_uppercase(),
                capitalize(keyword),
                format!("paid for {}", keyword),
                format!("{} payment", keyword),
                format!("{} expense", keyword),
            ];
            for text in variants {
                examples.push(TrainingExample {
                    text,
                    label: category.to_string(),
                });
            }
        }
    }
    examples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_size() {
        let keyword_count: usize = CATEGORY_KEYWORDS.iter().map(|(_, ks)| ks.len()).sum();
        let corpus = synthetic_corpus();
        assert_eq!(corpus.len(), keyword_count * 6);
    }

    #[test]
    fn test_corpus_deterministic() {
        assert_eq!(synthetic_corpus(), synthetic_corpus());
    }

    #[test]
    fn test_corpus_covers_every_category() {
        let corpus = synthetic_corpus();
        for (category, _) in CATEGORY_KEYWORDS {
            assert!(corpus.iter().any(|ex| ex.label == *category));
        }
    }

    #[test]
    fn test_paraphrase_shapes() {
        let corpus = synthetic_corpus();
        assert!(corpus
            .iter()
            .any(|ex| ex.text == "paid for coffee" && ex.label == "Food & Dining"));
        assert!(corpus.iter().any(|ex| ex.text == "COFFEE"));
        assert!(corpus.iter().any(|ex| ex.text == "coffee payment"));
    }
}
