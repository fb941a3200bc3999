/// Retrieval subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("entity extraction failed: {reason}")]
    ExtractionFailed { reason: String },

    #[error("search failed: {reason}")]
    SearchFailed { reason: String },

    #[error("stage '{stage}' failed: {reason}")]
    StageFailed { stage: String, reason: String },

    #[error("unknown pipeline preset: {name} (available: basic, advanced, semantic)")]
    UnknownPreset { name: String },
}
