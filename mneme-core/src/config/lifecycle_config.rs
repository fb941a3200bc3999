use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants::MAX_LIFECYCLE_BATCH;

/// Hot/warm/cold tiering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    pub hot_retention_days: i64,
    pub warm_retention_days: i64,
    /// Hot documents above this importance demote to Warm (vector entry
    /// kept); at or below they go straight to Cold.
    pub importance_cutoff: f64,
    /// Documents scanned per layer per run.
    pub batch_limit: usize,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            hot_retention_days: defaults::DEFAULT_HOT_RETENTION_DAYS,
            warm_retention_days: defaults::DEFAULT_WARM_RETENTION_DAYS,
            importance_cutoff: defaults::DEFAULT_IMPORTANCE_CUTOFF,
            batch_limit: MAX_LIFECYCLE_BATCH,
        }
    }
}
