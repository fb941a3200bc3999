//! Linear staged retrieval pipeline.
//!
//! Stages run strictly in order; each stage's output is the next stage's
//! `previous` input. There is no branching — simplicity over latency.
//! Parallelizing sibling recall stages is a valid extension, not the
//! current contract.

mod presets;

pub use presets::PipelineDeps;

use tracing::debug;

use mneme_core::document::DocumentFilters;
use mneme_core::errors::MnemeResult;
use mneme_core::result::RetrievalResult;

use crate::stages::Stage;

/// Downstream weighting bias chosen by the intent-adaptive stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentBias {
    /// Query mentions entities: favor graph recall.
    Graph,
    /// No entities found: favor vector recall.
    Vector,
}

/// Shared state threaded through the stage chain.
///
/// Recall stages multiply their scores by the side weights (1.0 is
/// neutral) and apply `filters` to hydrated candidates.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub query: String,
    pub top_k: usize,
    pub vector_weight: f64,
    pub graph_weight: f64,
    pub intent_bias: Option<IntentBias>,
    /// Metadata filters applied by the recall stages.
    pub filters: DocumentFilters,
}

impl PipelineContext {
    pub fn new(query: &str, top_k: usize) -> Self {
        Self {
            query: query.to_string(),
            top_k,
            vector_weight: 1.0,
            graph_weight: 1.0,
            intent_bias: None,
            filters: DocumentFilters::default(),
        }
    }

    pub fn with_filters(mut self, filters: DocumentFilters) -> Self {
        self.filters = filters;
        self
    }
}

/// An ordered chain of stages with a name ("basic", "advanced", …).
///
/// Failure policy: any stage error fails the whole pipeline. Recall stages
/// treat store unavailability as degradation (empty contribution plus a
/// warning), which is not a stage error.
pub struct RetrievalPipeline {
    name: String,
    stages: Vec<Box<dyn Stage>>,
    vector_weight: f64,
    graph_weight: f64,
}

impl std::fmt::Debug for RetrievalPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalPipeline")
            .field("name", &self.name)
            .field("stages", &self.stage_names())
            .field("vector_weight", &self.vector_weight)
            .field("graph_weight", &self.graph_weight)
            .finish()
    }
}

impl RetrievalPipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
            vector_weight: 1.0,
            graph_weight: 1.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Append a stage, builder-style.
    pub fn add_stage(mut self, stage: Box<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Recall weights seeded into the context by [`Self::execute`].
    pub fn with_weights(mut self, vector_weight: f64, graph_weight: f64) -> Self {
        self.vector_weight = vector_weight;
        self.graph_weight = graph_weight;
        self
    }

    /// Run the chain. A blank query short-circuits to an empty result.
    pub async fn execute(&self, query: &str, top_k: usize) -> MnemeResult<Vec<RetrievalResult>> {
        let mut ctx = PipelineContext::new(query, top_k);
        ctx.vector_weight = self.vector_weight;
        ctx.graph_weight = self.graph_weight;
        self.execute_with_context(query, top_k, ctx).await
    }

    /// Run the chain with caller-seeded context (query/top_k in the
    /// context are overwritten from the arguments).
    pub async fn execute_with_context(
        &self,
        query: &str,
        top_k: usize,
        mut ctx: PipelineContext,
    ) -> MnemeResult<Vec<RetrievalResult>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        ctx.query = query.to_string();
        ctx.top_k = top_k;

        let mut results: Option<Vec<RetrievalResult>> = None;
        for stage in &self.stages {
            let output = stage.process(query, results.as_deref(), &mut ctx).await?;
            debug!(
                pipeline = %self.name,
                stage = stage.name(),
                results = output.len(),
                "stage complete"
            );
            results = Some(output);
        }

        let mut results = results.unwrap_or_default();
        results.truncate(top_k);
        Ok(results)
    }
}
