use serde::{Deserialize, Serialize};

use super::defaults;

/// Retrieval subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Results returned per retrieval call.
    pub top_k: usize,
    /// RRF smoothing constant. Higher k reduces the influence of
    /// high-ranking items from any single list.
    pub rrf_k: u32,
    pub vector_weight: f64,
    pub graph_weight: f64,
    pub enable_multi_hop: bool,
    pub max_hops: usize,
    /// Per-hop score decay during expansion.
    pub hop_decay: f64,
    /// Weight of the original score in the heuristic rerank blend;
    /// the remainder goes to token overlap.
    pub rerank_original_weight: f64,
    /// MMR λ: 1.0 is pure relevance, 0.0 is pure novelty.
    pub mmr_lambda: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: defaults::DEFAULT_TOP_K,
            rrf_k: defaults::DEFAULT_RRF_K,
            vector_weight: defaults::DEFAULT_VECTOR_WEIGHT,
            graph_weight: defaults::DEFAULT_GRAPH_WEIGHT,
            enable_multi_hop: defaults::DEFAULT_ENABLE_MULTI_HOP,
            max_hops: defaults::DEFAULT_MAX_HOPS,
            hop_decay: defaults::DEFAULT_HOP_DECAY,
            rerank_original_weight: defaults::DEFAULT_RERANK_ORIGINAL_WEIGHT,
            mmr_lambda: defaults::DEFAULT_MMR_LAMBDA,
        }
    }
}
