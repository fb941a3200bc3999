use async_trait::async_trait;

use crate::errors::MnemeResult;

/// Embedding generation provider.
///
/// Unlike entity extraction, embedding failure is fatal to a create call:
/// a document without a vector cannot enter the vector index.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> MnemeResult<Vec<f32>>;

    /// The dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}
