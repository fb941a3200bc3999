//! Engine configuration, loadable from TOML.

pub mod defaults;

mod fusion_weights;
mod lifecycle_config;
mod retrieval_config;

pub use fusion_weights::FusionWeights;
pub use lifecycle_config::LifecycleConfig;
pub use retrieval_config::RetrievalConfig;

use serde::{Deserialize, Serialize};

use crate::errors::{MnemeError, MnemeResult};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MnemeConfig {
    pub retrieval: RetrievalConfig,
    pub lifecycle: LifecycleConfig,
    pub fusion: FusionWeights,
}

impl MnemeConfig {
    /// Parse a configuration from a TOML string. Missing sections and
    /// fields fall back to defaults.
    pub fn from_toml_str(s: &str) -> MnemeResult<Self> {
        toml::from_str(s).map_err(|e| MnemeError::Config(e.to_string()))
    }
}
