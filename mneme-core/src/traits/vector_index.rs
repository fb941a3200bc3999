use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::MnemeResult;

/// A nearest-neighbor match from the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorMatch {
    pub doc_id: String,
    /// Similarity score, higher is closer.
    pub score: f64,
}

/// Index-level statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndexStats {
    pub count: usize,
    pub dimensions: usize,
}

/// Nearest-neighbor index over document embeddings.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Add a vector, returning the index-internal id.
    async fn add(&self, embedding: &[f32], doc_id: &str) -> MnemeResult<i64>;

    /// Add a batch of vectors. `embeddings` and `doc_ids` must be equal length.
    async fn add_batch(
        &self,
        embeddings: &[Vec<f32>],
        doc_ids: &[String],
    ) -> MnemeResult<Vec<i64>>;

    /// Search for the `top_k` nearest neighbors, sorted by score descending.
    async fn search(&self, embedding: &[f32], top_k: usize) -> MnemeResult<Vec<VectorMatch>>;

    /// Remove a document's vector. Idempotent: returns `false` when the
    /// document was not indexed, never an error.
    async fn remove(&self, doc_id: &str) -> MnemeResult<bool>;

    async fn stats(&self) -> MnemeResult<VectorIndexStats>;
}
