//! Error taxonomy: per-subsystem enums aggregated into [`MnemeError`].

mod retrieval_error;
mod storage_error;

pub use retrieval_error::RetrievalError;
pub use storage_error::StorageError;

/// Top-level error for the Mneme engine.
#[derive(Debug, thiserror::Error)]
pub enum MnemeError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// Result alias used throughout the workspace.
pub type MnemeResult<T> = Result<T, MnemeError>;
