//! Named pipeline presets assembled from shared dependencies.

use std::sync::Arc;

use tracing::debug;

use mneme_core::config::RetrievalConfig;
use mneme_core::errors::{MnemeResult, RetrievalError};
use mneme_core::traits::{Embedder, EntityExtractor, GraphStore, MetadataStore, Tokenizer, VectorIndex};

use crate::graph_retriever::GraphRetriever;
use crate::pipeline::RetrievalPipeline;
use crate::stages::{
    DiversityStage, FusionStage, GraphStage, IntentAdaptiveStage, RerankStage, VectorStage,
};

/// Everything a preset may wire into its stages. Graph recall and entity
/// extraction are optional capabilities; presets that need them degrade
/// to their vector-only shape when they are absent.
pub struct PipelineDeps {
    pub vector: Arc<dyn VectorIndex>,
    pub metadata: Arc<dyn MetadataStore>,
    pub embedder: Arc<dyn Embedder>,
    pub graph: Option<Arc<dyn GraphStore>>,
    pub extractor: Option<Arc<dyn EntityExtractor>>,
    pub tokenizer: Arc<dyn Tokenizer>,
    pub config: RetrievalConfig,
}

impl PipelineDeps {
    /// Build a preset by name.
    ///
    /// - `"basic"`: vector recall, heuristic rerank.
    /// - `"advanced"`: weighted vector and graph recall fused with RRF,
    ///   then rerank.
    /// - `"semantic"`: vector recall, intent classification, rerank,
    ///   MMR diversity.
    ///
    /// Only the advanced preset carries recall weights; the others leave
    /// the neutral 1.0 defaults so rerank sees raw recall scores.
    pub fn build(&self, name: &str) -> MnemeResult<RetrievalPipeline> {
        let pipeline = match name {
            "basic" => RetrievalPipeline::new(name)
                .add_stage(Box::new(self.vector_stage()))
                .add_stage(Box::new(self.rerank_stage())),
            "advanced" => {
                let mut pipeline = RetrievalPipeline::new(name)
                    .with_weights(self.config.vector_weight, self.config.graph_weight)
                    .add_stage(Box::new(self.vector_stage()));
                match (self.graph.as_ref(), self.extractor.as_ref()) {
                    (Some(graph), Some(extractor)) => {
                        let retriever = Arc::new(GraphRetriever::new(
                            Arc::clone(graph),
                            Arc::clone(&self.metadata),
                            Arc::clone(extractor),
                            Arc::clone(&self.tokenizer),
                            &self.config,
                        ));
                        pipeline = pipeline
                            .add_stage(Box::new(GraphStage::new(retriever)))
                            .add_stage(Box::new(FusionStage::new(self.config.rrf_k)));
                    }
                    _ => {
                        debug!("graph recall unavailable, advanced preset runs vector-only");
                    }
                }
                pipeline.add_stage(Box::new(self.rerank_stage()))
            }
            "semantic" => {
                let mut pipeline =
                    RetrievalPipeline::new(name).add_stage(Box::new(self.vector_stage()));
                if let Some(extractor) = self.extractor.as_ref() {
                    pipeline = pipeline
                        .add_stage(Box::new(IntentAdaptiveStage::new(Arc::clone(extractor))));
                }
                pipeline
                    .add_stage(Box::new(self.rerank_stage()))
                    .add_stage(Box::new(DiversityStage::new(
                        Arc::clone(&self.tokenizer),
                        self.config.mmr_lambda,
                    )))
            }
            other => {
                return Err(RetrievalError::UnknownPreset {
                    name: other.to_string(),
                }
                .into())
            }
        };

        debug!(preset = name, stages = ?pipeline.stage_names(), "pipeline assembled");
        Ok(pipeline)
    }

    fn vector_stage(&self) -> VectorStage {
        VectorStage::new(
            Arc::clone(&self.vector),
            Arc::clone(&self.metadata),
            Arc::clone(&self.embedder),
        )
    }

    fn rerank_stage(&self) -> RerankStage {
        RerankStage::new(
            Arc::clone(&self.tokenizer),
            self.config.rerank_original_weight,
        )
    }
}
