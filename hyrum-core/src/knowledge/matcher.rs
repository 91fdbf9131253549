//! Keyword matching between user input and knowledge topics

use std::fmt;

use super::store::KnowledgeStore;

/// Full text of a matched topic, ready to be injected into a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excerpt {
    pub topic: String,
    pub text: String,
}

impl fmt::Display for Excerpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "🔹 {}: {}", self.topic.to_uppercase(), self.text)
    }
}

/// Case-insensitive substring matcher.
///
/// A topic matches when its key appears anywhere in the input, so short keys
/// can also match inside unrelated words. There is no ranking and no
/// deduplication; results follow the store's order.
pub struct KnowledgeMatcher;

impl KnowledgeMatcher {
    /// Excerpts for every topic whose key occurs in `text`.
    ///
    /// Topics without full text are skipped.
    pub fn find(text: &str, store: &KnowledgeStore) -> Vec<Excerpt> {
        let haystack = text.to_lowercase();

        store
            .records()
            .filter(|record| record.has_full_text())
            .filter(|record| {
                let needle = record.topic().to_lowercase();
                !needle.is_empty() && haystack.contains(&needle)
            })
            .map(|record| Excerpt {
                topic: record.topic().to_string(),
                text: record.full_text().to_string(),
            })
            .collect()
    }
}
