use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use mneme_core::errors::MnemeResult;
use mneme_core::result::RetrievalResult;
use mneme_core::traits::EntityExtractor;

use crate::pipeline::{IntentBias, PipelineContext};
use crate::stages::Stage;

/// Transform stage: classifies the query and records a weighting bias in
/// the context for downstream consumers. Results pass through unchanged.
///
/// A query that mentions known entities leans on graph recall; one that
/// does not leans on vector recall. Extractor failure defaults to the
/// vector bias with a warning.
pub struct IntentAdaptiveStage {
    extractor: Arc<dyn EntityExtractor>,
}

impl IntentAdaptiveStage {
    pub fn new(extractor: Arc<dyn EntityExtractor>) -> Self {
        Self { extractor }
    }
}

#[async_trait]
impl Stage for IntentAdaptiveStage {
    async fn process(
        &self,
        query: &str,
        previous: Option<&[RetrievalResult]>,
        ctx: &mut PipelineContext,
    ) -> MnemeResult<Vec<RetrievalResult>> {
        let bias = match self.extractor.extract(query).await {
            Ok(entities) if !entities.is_empty() => IntentBias::Graph,
            Ok(_) => IntentBias::Vector,
            Err(e) => {
                warn!(error = %e, "intent extraction failed, defaulting to vector bias");
                IntentBias::Vector
            }
        };
        debug!(?bias, "query intent classified");
        ctx.intent_bias = Some(bias);

        Ok(previous.unwrap_or_default().to_vec())
    }

    fn name(&self) -> &'static str {
        "intent_adaptive"
    }
}
