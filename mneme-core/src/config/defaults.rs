//! Named default values backing the config `Default` impls.

/// Default number of results returned by a retrieval call.
pub const DEFAULT_TOP_K: usize = 10;

/// RRF smoothing constant.
pub const DEFAULT_RRF_K: u32 = 60;

/// Default vector-side weight for weighted hybrid fusion.
pub const DEFAULT_VECTOR_WEIGHT: f64 = 0.6;

/// Default graph-side weight for weighted hybrid fusion.
pub const DEFAULT_GRAPH_WEIGHT: f64 = 0.4;

/// Multi-hop expansion enabled by default.
pub const DEFAULT_ENABLE_MULTI_HOP: bool = true;

/// Default maximum hop distance for graph expansion.
pub const DEFAULT_MAX_HOPS: usize = 2;

/// Per-hop score decay during multi-hop expansion.
pub const DEFAULT_HOP_DECAY: f64 = 0.7;

/// Weight of the original score in the heuristic rerank blend.
pub const DEFAULT_RERANK_ORIGINAL_WEIGHT: f64 = 0.7;

/// MMR relevance/novelty trade-off.
pub const DEFAULT_MMR_LAMBDA: f64 = 0.7;

/// Time-decay horizon for the temporal fusion component (days).
pub const DEFAULT_TIME_DECAY_DAYS: f64 = 365.0;

/// Days a document stays Hot before demotion is considered.
pub const DEFAULT_HOT_RETENTION_DAYS: i64 = 7;

/// Days a document stays Warm before demotion to Cold.
pub const DEFAULT_WARM_RETENTION_DAYS: i64 = 30;

/// Importance above which a Hot document demotes to Warm (vector kept)
/// instead of straight to Cold.
pub const DEFAULT_IMPORTANCE_CUTOFF: f64 = 0.7;
