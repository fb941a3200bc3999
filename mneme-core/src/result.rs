//! Ranked retrieval results and their provenance tags.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which retrieval path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    Vector,
    Graph,
    /// Reached through multi-hop expansion from a graph seed.
    GraphExpanded,
    /// Both vector and graph sides contributed to the fused score.
    Hybrid,
}

impl std::fmt::Display for ResultSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResultSource::Vector => "vector",
            ResultSource::Graph => "graph",
            ResultSource::GraphExpanded => "graph_expanded",
            ResultSource::Hybrid => "hybrid",
        };
        f.write_str(s)
    }
}

/// One ranked result. `score` is ≥ 0 after fusion; `metadata` carries
/// `matched_entities`, `hop_distance`, and `base_doc_id` when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub doc_id: String,
    pub content: String,
    pub score: f64,
    pub source: ResultSource,
    pub metadata: HashMap<String, Value>,
}

impl RetrievalResult {
    pub fn new(
        doc_id: impl Into<String>,
        content: impl Into<String>,
        score: f64,
        source: ResultSource,
    ) -> Self {
        Self {
            doc_id: doc_id.into(),
            content: content.into(),
            score,
            source,
            metadata: HashMap::new(),
        }
    }

    /// Attach a metadata entry, consuming and returning self.
    pub fn with_meta(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Hop distance recorded during multi-hop expansion, if any.
    pub fn hop_distance(&self) -> Option<u64> {
        self.metadata.get("hop_distance").and_then(Value::as_u64)
    }
}

/// Sort results by score descending with a deterministic doc_id tie-break.
pub fn sort_by_score(results: &mut [RetrievalResult]) {
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.doc_id.cmp(&b.doc_id))
    });
}
