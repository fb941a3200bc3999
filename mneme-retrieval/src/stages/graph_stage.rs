use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use mneme_core::constants::OVERFETCH_FACTOR;
use mneme_core::errors::MnemeResult;
use mneme_core::result::RetrievalResult;

use crate::graph_retriever::{GraphRetriever, GraphRetrieverOptions};
use crate::pipeline::PipelineContext;
use crate::stages::Stage;

/// Transform stage: appends entity-graph recall to the chain so a
/// downstream fusion stage sees both source lists. Scores are scaled by
/// the context's graph weight; context filters are pushed down into the
/// retriever, which hydrates its own candidates.
///
/// Graph-side failure degrades to passing the previous results through
/// unchanged, with a warning.
pub struct GraphStage {
    retriever: Arc<GraphRetriever>,
}

impl GraphStage {
    pub fn new(retriever: Arc<GraphRetriever>) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl Stage for GraphStage {
    async fn process(
        &self,
        query: &str,
        previous: Option<&[RetrievalResult]>,
        ctx: &mut PipelineContext,
    ) -> MnemeResult<Vec<RetrievalResult>> {
        let mut combined: Vec<RetrievalResult> = previous.unwrap_or_default().to_vec();

        let options = GraphRetrieverOptions {
            filters: Some(ctx.filters.clone()),
            ..Default::default()
        };
        let graph_results = match self
            .retriever
            .retrieve_with_options(query, ctx.top_k * OVERFETCH_FACTOR, options)
            .await
        {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, "graph recall unavailable, passing previous results through");
                return Ok(combined);
            }
        };

        combined.extend(graph_results.into_iter().map(|mut result| {
            result.score *= ctx.graph_weight;
            result
        }));

        Ok(combined)
    }

    fn name(&self) -> &'static str {
        "graph_retrieval"
    }
}
