use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::EntityType;
use crate::errors::MnemeResult;

/// A document matched through its mentioned entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityMatch {
    pub doc_id: String,
    /// Raw relevance (entity match count); the retriever normalizes per batch.
    pub score: f64,
    pub matched_entities: Vec<String>,
}

/// A document reached by traversing shared-entity edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedDoc {
    pub doc_id: String,
    /// Hop distance from the seed document.
    pub distance: usize,
    pub score: f64,
    pub shared_entities: Vec<String>,
}

/// Property-graph store holding document and entity nodes.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Create a node of the given type, returning its node id.
    async fn create_node(
        &self,
        node_type: &str,
        properties: HashMap<String, Value>,
    ) -> MnemeResult<String>;

    /// Merge-by-name entity upsert. The type is set on create only;
    /// `metadata` (e.g. extractor confidence) is refreshed on every call.
    async fn upsert_entity(
        &self,
        name: &str,
        entity_type: EntityType,
        metadata: HashMap<String, Value>,
    ) -> MnemeResult<String>;

    /// Create a relation. On repeat, the weight is merged additively,
    /// never overwritten.
    async fn create_relation(
        &self,
        source_id: &str,
        target_id: &str,
        relation_type: &str,
        weight: f64,
    ) -> MnemeResult<()>;

    /// Find documents mentioning any of `entities`, ranked by match count.
    async fn search_by_entities(
        &self,
        entities: &[String],
        top_k: usize,
    ) -> MnemeResult<Vec<EntityMatch>>;

    /// Find documents related to `doc_id` via shared entities, up to
    /// `max_hops` edges away.
    async fn find_related_docs(
        &self,
        doc_id: &str,
        max_hops: usize,
        limit: usize,
    ) -> MnemeResult<Vec<RelatedDoc>>;

    /// Detach and delete a node. Returns `false` when absent.
    async fn delete_node(&self, node_id: &str) -> MnemeResult<bool>;

    /// Escape hatch: run a raw query in the store's native language.
    async fn execute_query(&self, query: &str) -> MnemeResult<Vec<HashMap<String, Value>>>;
}
