/// Pluggable text segmentation capability.
///
/// Used for the entity-extraction fallback and for token-overlap scoring.
/// Implementations may wrap language-specific segmenters; the core never
/// depends on a particular NLP library.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}
