use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use mneme_core::entity::{Entity, EntityType};
use mneme_core::errors::{MnemeResult, RetrievalError, StorageError};
use mneme_core::traits::{Embedder, EntityExtractor};

/// Dictionary-backed entity extractor: returns the known entities that
/// occur in the input, ordered by position of first occurrence.
pub struct MockEntityExtractor {
    vocabulary: Vec<Entity>,
    failing: AtomicBool,
}

impl MockEntityExtractor {
    pub fn new(vocabulary: Vec<Entity>) -> Self {
        Self {
            vocabulary,
            failing: AtomicBool::new(false),
        }
    }

    /// Convenience: a vocabulary of Topic entities with the given confidence.
    pub fn with_topics(names: &[(&str, f64)]) -> Self {
        Self::new(
            names
                .iter()
                .map(|(name, score)| Entity::new(*name, EntityType::Topic, *score))
                .collect(),
        )
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl EntityExtractor for MockEntityExtractor {
    async fn extract(&self, text: &str) -> MnemeResult<Vec<Entity>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RetrievalError::ExtractionFailed {
                reason: "mock extractor offline".to_string(),
            }
            .into());
        }

        let mut found: Vec<(usize, Entity)> = self
            .vocabulary
            .iter()
            .filter_map(|entity| text.find(&entity.text).map(|pos| (pos, entity.clone())))
            .collect();
        found.sort_by_key(|(pos, _)| *pos);
        Ok(found.into_iter().map(|(_, entity)| entity).collect())
    }
}

/// Deterministic embedder: folds bytes into a fixed-dimension vector and
/// L2-normalizes. Identical text always embeds identically.
pub struct MockEmbedder {
    dimensions: usize,
    failing: AtomicBool,
}

impl MockEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new(8)
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> MnemeResult<Vec<f32>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::EmbeddingFailed {
                reason: "mock embedder offline".to_string(),
            }
            .into());
        }

        let mut vector = vec![0.0f32; self.dimensions];
        for (i, byte) in text.bytes().enumerate() {
            vector[i % self.dimensions] += byte as f32 / 255.0;
        }
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        } else {
            vector[0] = 1.0;
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
