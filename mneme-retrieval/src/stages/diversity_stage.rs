use std::sync::Arc;

use async_trait::async_trait;

use mneme_core::errors::MnemeResult;
use mneme_core::result::RetrievalResult;
use mneme_core::traits::Tokenizer;

use crate::pipeline::PipelineContext;
use crate::stages::Stage;
use crate::tokenize::jaccard;

/// Transform stage: greedy maximal-marginal-relevance selection.
///
/// Iteratively picks the candidate maximizing
/// `λ × relevance − (1 − λ) × max_jaccard_to_selected`.
/// λ = 1 reduces to pure relevance order; λ = 0 to pure novelty.
pub struct DiversityStage {
    tokenizer: Arc<dyn Tokenizer>,
    lambda: f64,
}

impl DiversityStage {
    pub fn new(tokenizer: Arc<dyn Tokenizer>, lambda: f64) -> Self {
        Self {
            tokenizer,
            lambda: lambda.clamp(0.0, 1.0),
        }
    }
}

#[async_trait]
impl Stage for DiversityStage {
    async fn process(
        &self,
        _query: &str,
        previous: Option<&[RetrievalResult]>,
        ctx: &mut PipelineContext,
    ) -> MnemeResult<Vec<RetrievalResult>> {
        let candidates = previous.unwrap_or_default();
        if candidates.len() <= 1 {
            return Ok(candidates.to_vec());
        }

        let token_sets: Vec<Vec<String>> = candidates
            .iter()
            .map(|r| self.tokenizer.tokenize(&r.content))
            .collect();

        let mut remaining: Vec<usize> = (0..candidates.len()).collect();
        let mut selected: Vec<usize> = Vec::with_capacity(ctx.top_k.min(candidates.len()));

        while selected.len() < ctx.top_k && !remaining.is_empty() {
            let mut best_pos = 0;
            let mut best_score = f64::NEG_INFINITY;
            for (pos, &idx) in remaining.iter().enumerate() {
                let max_sim = selected
                    .iter()
                    .map(|&s| jaccard(&token_sets[idx], &token_sets[s]))
                    .fold(0.0_f64, f64::max);
                let mmr = self.lambda * candidates[idx].score - (1.0 - self.lambda) * max_sim;
                // Ties keep the earlier (higher-ranked) candidate.
                if mmr > best_score {
                    best_score = mmr;
                    best_pos = pos;
                }
            }
            selected.push(remaining.remove(best_pos));
        }

        Ok(selected
            .into_iter()
            .map(|idx| candidates[idx].clone())
            .collect())
    }

    fn name(&self) -> &'static str {
        "diversity"
    }
}
