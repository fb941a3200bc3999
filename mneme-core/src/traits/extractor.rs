use async_trait::async_trait;

use crate::entity::Entity;
use crate::errors::MnemeResult;

/// Named-entity extraction provider.
///
/// May fail or time out; callers degrade to a tokenizer fallback rather
/// than propagating the failure.
#[async_trait]
pub trait EntityExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> MnemeResult<Vec<Entity>>;
}
