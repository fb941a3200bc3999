use serde::{Deserialize, Serialize};

use super::defaults;

/// Component weights for multi-dimensional score fusion.
///
/// Weights need not sum to 1; [`FusionWeights::normalized`] renormalizes
/// before use. An all-zero weight set normalizes to an equal split rather
/// than dividing by zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionWeights {
    pub vector: f64,
    pub graph: f64,
    pub keyword: f64,
    pub time: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            vector: defaults::DEFAULT_VECTOR_WEIGHT,
            graph: defaults::DEFAULT_GRAPH_WEIGHT,
            keyword: 0.0,
            time: 0.0,
        }
    }
}

impl FusionWeights {
    pub fn new(vector: f64, graph: f64, keyword: f64, time: f64) -> Self {
        Self {
            vector,
            graph,
            keyword,
            time,
        }
    }

    /// Renormalize so the weights sum to 1. Zero-sum input falls back to
    /// an equal split across all four components.
    pub fn normalized(&self) -> Self {
        let total = self.vector + self.graph + self.keyword + self.time;
        if total <= f64::EPSILON {
            return Self {
                vector: 0.25,
                graph: 0.25,
                keyword: 0.25,
                time: 0.25,
            };
        }
        Self {
            vector: self.vector / total,
            graph: self.graph / total,
            keyword: self.keyword / total,
            time: self.time / total,
        }
    }
}
