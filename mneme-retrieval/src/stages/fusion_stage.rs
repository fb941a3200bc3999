use async_trait::async_trait;

use mneme_core::errors::MnemeResult;
use mneme_core::result::RetrievalResult;

use crate::fusion::rrf;
use crate::pipeline::PipelineContext;
use crate::stages::Stage;

/// Transform stage: collapses the mixed-source candidate list into one
/// rank-fused list via reciprocal rank fusion.
pub struct FusionStage {
    rrf_k: u32,
}

impl FusionStage {
    pub fn new(rrf_k: u32) -> Self {
        Self { rrf_k }
    }
}

#[async_trait]
impl Stage for FusionStage {
    async fn process(
        &self,
        _query: &str,
        previous: Option<&[RetrievalResult]>,
        _ctx: &mut PipelineContext,
    ) -> MnemeResult<Vec<RetrievalResult>> {
        Ok(rrf::fuse(previous.unwrap_or_default(), self.rrf_k))
    }

    fn name(&self) -> &'static str {
        "score_fusion"
    }
}
