use async_trait::async_trait;

use crate::document::{Document, DocumentFilters, DocumentUpdate};
use crate::errors::MnemeResult;

/// Durable document metadata: the commit point of the write path.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn insert(&self, doc: &Document) -> MnemeResult<()>;

    async fn get(&self, doc_id: &str) -> MnemeResult<Option<Document>>;

    /// Batch hydration. Missing ids are silently absent from the output.
    async fn get_by_ids(&self, doc_ids: &[String]) -> MnemeResult<Vec<Document>>;

    /// Apply a patch. Returns `false` when the document does not exist.
    async fn update(&self, doc_id: &str, update: &DocumentUpdate) -> MnemeResult<bool>;

    /// Returns `false` when the document does not exist.
    async fn delete(&self, doc_id: &str) -> MnemeResult<bool>;

    /// Filtered listing with pagination.
    async fn list(&self, filters: &DocumentFilters) -> MnemeResult<Vec<Document>>;

    async fn count(&self, filters: &DocumentFilters) -> MnemeResult<usize>;
}
