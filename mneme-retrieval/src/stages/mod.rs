//! Single-purpose retrieval transforms implementing one contract.
//!
//! "Source" stages ignore `previous`; "transform" stages consume and
//! augment it.

mod diversity_stage;
mod fusion_stage;
mod graph_stage;
mod intent_stage;
mod rerank_stage;
mod vector_stage;

pub use diversity_stage::DiversityStage;
pub use fusion_stage::FusionStage;
pub use graph_stage::GraphStage;
pub use intent_stage::IntentAdaptiveStage;
pub use rerank_stage::RerankStage;
pub use vector_stage::VectorStage;

use async_trait::async_trait;

use mneme_core::errors::MnemeResult;
use mneme_core::result::RetrievalResult;

use crate::pipeline::PipelineContext;

/// One step of the retrieval pipeline.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Transform the chain state. `previous` is `None` for the first stage.
    async fn process(
        &self,
        query: &str,
        previous: Option<&[RetrievalResult]>,
        ctx: &mut PipelineContext,
    ) -> MnemeResult<Vec<RetrievalResult>>;

    /// Stable stage identifier for logs and introspection.
    fn name(&self) -> &'static str;
}
