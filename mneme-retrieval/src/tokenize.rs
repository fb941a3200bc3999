//! Default text segmentation behind the pluggable [`Tokenizer`] capability.

use std::collections::HashSet;

use mneme_core::traits::Tokenizer;

/// Tokens this short carry no retrieval signal.
const MIN_TOKEN_LEN: usize = 2;

/// Minimal stopword set for the fallback segmenter. Deliberately small:
/// anything heavier belongs in a real Tokenizer implementation.
const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "of", "to", "in", "on", "is", "are", "was", "it", "for",
    "with", "at", "by", "this", "that",
];

/// Simple segmenter: lowercase, split on non-alphanumeric boundaries,
/// drop short tokens and stopwords.
#[derive(Debug, Clone, Default)]
pub struct SimpleTokenizer;

impl Tokenizer for SimpleTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let stopwords: HashSet<&str> = STOPWORDS.iter().copied().collect();
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| token.chars().count() >= MIN_TOKEN_LEN)
            .filter(|token| !stopwords.contains(token))
            .map(ToString::to_string)
            .collect()
    }
}

/// Token-overlap ratio: `|query ∩ content| / |query|`, 0 when the query
/// has no tokens. Duplicates within a side count once.
pub fn overlap_ratio(query_tokens: &[String], content_tokens: &[String]) -> f64 {
    if query_tokens.is_empty() {
        return 0.0;
    }
    let query: HashSet<&str> = query_tokens.iter().map(String::as_str).collect();
    let content: HashSet<&str> = content_tokens.iter().map(String::as_str).collect();
    let overlap = query.intersection(&content).count();
    overlap as f64 / query.len() as f64
}

/// Jaccard similarity over token sets. Empty-vs-empty is 0.
pub fn jaccard(a: &[String], b: &[String]) -> f64 {
    let sa: HashSet<&str> = a.iter().map(String::as_str).collect();
    let sb: HashSet<&str> = b.iter().map(String::as_str).collect();
    let union = sa.union(&sb).count();
    if union == 0 {
        return 0.0;
    }
    sa.intersection(&sb).count() as f64 / union as f64
}
