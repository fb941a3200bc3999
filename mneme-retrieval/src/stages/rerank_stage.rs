use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use mneme_core::errors::MnemeResult;
use mneme_core::result::{sort_by_score, RetrievalResult};
use mneme_core::traits::Tokenizer;

use crate::pipeline::PipelineContext;
use crate::stages::Stage;
use crate::tokenize::overlap_ratio;

/// Transform stage: blends each candidate's score with its token overlap
/// against the query, then re-sorts.
///
/// `score = original_weight × score + (1 − original_weight) × overlap`.
pub struct RerankStage {
    tokenizer: Arc<dyn Tokenizer>,
    original_weight: f64,
}

impl RerankStage {
    pub fn new(tokenizer: Arc<dyn Tokenizer>, original_weight: f64) -> Self {
        Self {
            tokenizer,
            original_weight: original_weight.clamp(0.0, 1.0),
        }
    }
}

#[async_trait]
impl Stage for RerankStage {
    async fn process(
        &self,
        query: &str,
        previous: Option<&[RetrievalResult]>,
        _ctx: &mut PipelineContext,
    ) -> MnemeResult<Vec<RetrievalResult>> {
        let mut results: Vec<RetrievalResult> = previous.unwrap_or_default().to_vec();
        let query_tokens = self.tokenizer.tokenize(query);

        for result in &mut results {
            let content_tokens = self.tokenizer.tokenize(&result.content);
            let overlap = overlap_ratio(&query_tokens, &content_tokens);
            result
                .metadata
                .insert("original_score".to_string(), json!(result.score));
            result.score =
                self.original_weight * result.score + (1.0 - self.original_weight) * overlap;
        }

        sort_by_score(&mut results);
        Ok(results)
    }

    fn name(&self) -> &'static str {
        "rerank"
    }
}
