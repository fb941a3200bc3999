//! Score fusion: Reciprocal Rank Fusion over per-source rank lists, and
//! multi-dimensional weighted fusion (vector + graph + keyword + time).

pub mod rrf;
pub mod weighted;

pub use weighted::WeightedFusion;
