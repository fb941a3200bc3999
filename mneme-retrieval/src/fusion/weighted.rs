//! Multi-dimensional weighted fusion: vector, graph, keyword-overlap, and
//! time-decay components blended under normalized weights.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::json;

use mneme_core::config::FusionWeights;
use mneme_core::constants::NEUTRAL_TIME_SCORE;
use mneme_core::result::{ResultSource, RetrievalResult};
use mneme_core::traits::Tokenizer;

use crate::tokenize::overlap_ratio;

/// Weight of the token-overlap ratio inside the keyword component;
/// the remainder goes to the boost-keyword bonus.
const KEYWORD_OVERLAP_WEIGHT: f64 = 0.7;
const KEYWORD_BOOST_WEIGHT: f64 = 0.3;

/// Four-component score fusion keyed by doc_id.
///
/// A doc_id missing a component contributes 0 for that component, except
/// time, which defaults to the neutral 0.5 × its weight.
pub struct WeightedFusion {
    weights: FusionWeights,
    /// Time-decay horizon in days.
    decay_days: f64,
    /// Extra keywords granted a bonus when present in content.
    boost_keywords: Vec<String>,
}

impl WeightedFusion {
    /// Weights are renormalized to sum to 1 at construction
    /// (zero-sum input becomes an equal split).
    pub fn new(weights: FusionWeights, decay_days: f64) -> Self {
        Self {
            weights: weights.normalized(),
            decay_days,
            boost_keywords: Vec::new(),
        }
    }

    pub fn with_boost_keywords(mut self, keywords: Vec<String>) -> Self {
        self.boost_keywords = keywords;
        self
    }

    pub fn weights(&self) -> &FusionWeights {
        &self.weights
    }

    /// Fuse vector-side and graph-side candidates.
    ///
    /// Keyword and time components are computed for vector-side candidates
    /// (they carry hydrated content); `timestamps` maps doc_id to document
    /// time for the decay term.
    pub fn fuse(
        &self,
        vector_results: &[RetrievalResult],
        graph_results: &[RetrievalResult],
        query: &str,
        timestamps: &HashMap<String, DateTime<Utc>>,
        tokenizer: &dyn Tokenizer,
        now: DateTime<Utc>,
    ) -> Vec<RetrievalResult> {
        struct Components {
            content: String,
            metadata: HashMap<String, serde_json::Value>,
            vector: f64,
            graph: f64,
            keyword: f64,
            time: f64,
        }

        let query_tokens = tokenizer.tokenize(query);
        let mut components: HashMap<String, Components> = HashMap::new();

        for result in vector_results {
            let keyword = self.keyword_score(&query_tokens, &result.content, tokenizer);
            let time = self.time_score(timestamps.get(&result.doc_id), now);
            components.insert(
                result.doc_id.clone(),
                Components {
                    content: result.content.clone(),
                    metadata: result.metadata.clone(),
                    vector: result.score * self.weights.vector,
                    graph: 0.0,
                    keyword: keyword * self.weights.keyword,
                    time: time * self.weights.time,
                },
            );
        }

        for result in graph_results {
            match components.get_mut(&result.doc_id) {
                Some(entry) => {
                    entry.graph = result.score * self.weights.graph;
                }
                None => {
                    components.insert(
                        result.doc_id.clone(),
                        Components {
                            content: result.content.clone(),
                            metadata: result.metadata.clone(),
                            vector: 0.0,
                            graph: result.score * self.weights.graph,
                            keyword: 0.0,
                            time: NEUTRAL_TIME_SCORE * self.weights.time,
                        },
                    );
                }
            }
        }

        components
            .into_iter()
            .map(|(doc_id, c)| {
                let score = c.vector + c.graph + c.keyword + c.time;
                let mut result = RetrievalResult::new(doc_id, c.content, score, ResultSource::Hybrid);
                result.metadata = c.metadata;
                result.metadata.insert("vector_score".to_string(), json!(c.vector));
                result.metadata.insert("graph_score".to_string(), json!(c.graph));
                result.metadata.insert("keyword_score".to_string(), json!(c.keyword));
                result.metadata.insert("time_score".to_string(), json!(c.time));
                result
            })
            .collect()
    }

    /// Keyword component: 0.7 × token-overlap ratio + 0.3 × boost bonus.
    fn keyword_score(
        &self,
        query_tokens: &[String],
        content: &str,
        tokenizer: &dyn Tokenizer,
    ) -> f64 {
        let content_tokens = tokenizer.tokenize(content);
        let overlap = overlap_ratio(query_tokens, &content_tokens);

        let boost = if self.boost_keywords.is_empty() {
            0.0
        } else {
            let content_lower = content.to_lowercase();
            let hits = self
                .boost_keywords
                .iter()
                .filter(|kw| content_lower.contains(&kw.to_lowercase()))
                .count();
            hits as f64 / self.boost_keywords.len() as f64
        };

        KEYWORD_OVERLAP_WEIGHT * overlap + KEYWORD_BOOST_WEIGHT * boost
    }

    /// Time component: exp(-age_days / decay_days); 0.5 when no timestamp.
    fn time_score(&self, timestamp: Option<&DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
        match timestamp {
            Some(ts) => {
                let age_days = (now - *ts).num_days().max(0) as f64;
                (-age_days / self.decay_days).exp()
            }
            None => NEUTRAL_TIME_SCORE,
        }
    }
}
