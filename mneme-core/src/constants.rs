/// Mneme system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Candidate over-fetch multiplier for recall before fusion.
pub const OVERFETCH_FACTOR: usize = 2;

/// Maximum number of seed results expanded during multi-hop traversal.
/// A resource guard, not a tunable: raising it changes the cost model.
pub const MAX_SEED_EXPANSION: usize = 5;

/// Per-seed result limit for `find_related_docs` during expansion.
pub const RELATED_DOC_LIMIT: usize = 10;

/// Neutral time-decay score assigned when a document has no timestamp.
pub const NEUTRAL_TIME_SCORE: f64 = 0.5;

/// Maximum batch size for lifecycle scans.
pub const MAX_LIFECYCLE_BATCH: usize = 1000;
