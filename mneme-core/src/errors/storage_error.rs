/// Storage subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("embedding failed: {reason}")]
    EmbeddingFailed { reason: String },

    #[error("vector index unavailable: {reason}")]
    VectorUnavailable { reason: String },

    #[error("graph store unavailable: {reason}")]
    GraphUnavailable { reason: String },

    #[error("metadata store error: {reason}")]
    Metadata { reason: String },

    /// One side of the dual write failed after the other may have completed.
    /// The completed side is not rolled back; no metadata row is committed,
    /// so the orphan is invisible to reads.
    #[error("partial write for document {doc_id}: {failed_side} write failed: {reason}")]
    PartialWrite {
        doc_id: String,
        failed_side: String,
        reason: String,
    },

    #[error("document not found: {id}")]
    NotFound { id: String },
}
