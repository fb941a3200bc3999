use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use mneme_core::entity::EntityType;
use mneme_core::errors::{MnemeResult, StorageError};
use mneme_core::traits::{EntityMatch, GraphStore, RelatedDoc};

/// In-memory property graph over document and entity nodes.
///
/// Implements the contracts the engine relies on: merge-by-name entity
/// upsert, merge-add relation weights, entity-count document search, and
/// shared-entity multi-hop traversal.
pub struct MockGraphStore {
    /// node_id -> (node_type, properties)
    nodes: DashMap<String, (String, HashMap<String, Value>)>,
    /// entity name -> entity node id (merge-by-name)
    entities: DashMap<String, String>,
    /// (source, target, relation_type) -> accumulated weight
    edges: DashMap<(String, String, String), f64>,
    unavailable: AtomicBool,
}

impl MockGraphStore {
    pub fn new() -> Self {
        Self {
            nodes: DashMap::new(),
            entities: DashMap::new(),
            edges: DashMap::new(),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Accumulated weight of a relation, for merge-add assertions.
    pub fn relation_weight(
        &self,
        source_id: &str,
        target_id: &str,
        relation_type: &str,
    ) -> Option<f64> {
        self.edges
            .get(&(
                source_id.to_string(),
                target_id.to_string(),
                relation_type.to_string(),
            ))
            .map(|w| *w)
    }

    pub fn entity_node_id(&self, name: &str) -> Option<String> {
        self.entities.get(name).map(|id| id.clone())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn check_available(&self) -> MnemeResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::GraphUnavailable {
                reason: "mock graph offline".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// doc_id carried in a Document node's properties, if this is one.
    fn doc_id_of(node: &(String, HashMap<String, Value>)) -> Option<String> {
        if node.0 != "Document" {
            return None;
        }
        node.1
            .get("id")
            .and_then(Value::as_str)
            .map(ToString::to_string)
    }

    /// Entity names mentioned by a document node.
    fn mentions_of(&self, node_id: &str) -> Vec<String> {
        self.edges
            .iter()
            .filter(|entry| {
                let (source, _, rel) = entry.key();
                source == node_id && rel == "MENTIONS"
            })
            .filter_map(|entry| {
                let (_, target, _) = entry.key();
                self.entities.iter().find_map(|e| {
                    if e.value() == target {
                        Some(e.key().clone())
                    } else {
                        None
                    }
                })
            })
            .collect()
    }

    /// All (doc_id, node_id, mentioned entity names) triples.
    fn doc_mentions(&self) -> Vec<(String, String, Vec<String>)> {
        self.nodes
            .iter()
            .filter_map(|entry| {
                let doc_id = Self::doc_id_of(entry.value())?;
                Some((doc_id, entry.key().clone(), self.mentions_of(entry.key())))
            })
            .collect()
    }
}

impl Default for MockGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphStore for MockGraphStore {
    async fn create_node(
        &self,
        node_type: &str,
        properties: HashMap<String, Value>,
    ) -> MnemeResult<String> {
        self.check_available()?;
        let node_id = format!(
            "{}:{}",
            node_type.to_lowercase(),
            properties
                .get("id")
                .and_then(Value::as_str)
                .map(ToString::to_string)
                .unwrap_or_else(|| uuid_like(&self.nodes))
        );
        self.nodes
            .insert(node_id.clone(), (node_type.to_string(), properties));
        Ok(node_id)
    }

    async fn upsert_entity(
        &self,
        name: &str,
        entity_type: EntityType,
        metadata: HashMap<String, Value>,
    ) -> MnemeResult<String> {
        self.check_available()?;

        if let Some(existing) = self.entities.get(name) {
            let node_id = existing.clone();
            drop(existing);
            // Type is fixed at create; metadata is refreshed on match.
            if let Some(mut node) = self.nodes.get_mut(&node_id) {
                node.1.extend(metadata);
            }
            return Ok(node_id);
        }

        let node_id = format!("entity:{name}");
        let mut properties = metadata;
        properties.insert("name".to_string(), Value::String(name.to_string()));
        properties.insert(
            "type".to_string(),
            serde_json::to_value(entity_type).unwrap_or(Value::Null),
        );
        self.nodes
            .insert(node_id.clone(), ("Entity".to_string(), properties));
        self.entities.insert(name.to_string(), node_id.clone());
        Ok(node_id)
    }

    async fn create_relation(
        &self,
        source_id: &str,
        target_id: &str,
        relation_type: &str,
        weight: f64,
    ) -> MnemeResult<()> {
        self.check_available()?;
        // Merge-add: repeat mentions accumulate, never overwrite.
        *self
            .edges
            .entry((
                source_id.to_string(),
                target_id.to_string(),
                relation_type.to_string(),
            ))
            .or_insert(0.0) += weight;
        Ok(())
    }

    async fn search_by_entities(
        &self,
        entities: &[String],
        top_k: usize,
    ) -> MnemeResult<Vec<EntityMatch>> {
        self.check_available()?;
        let wanted: HashSet<&str> = entities.iter().map(String::as_str).collect();

        let mut matches: Vec<EntityMatch> = self
            .doc_mentions()
            .into_iter()
            .filter_map(|(doc_id, _, mentioned)| {
                let matched: Vec<String> = mentioned
                    .into_iter()
                    .filter(|name| wanted.contains(name.as_str()))
                    .collect();
                if matched.is_empty() {
                    return None;
                }
                Some(EntityMatch {
                    doc_id,
                    score: matched.len() as f64,
                    matched_entities: matched,
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        matches.truncate(top_k);
        Ok(matches)
    }

    async fn find_related_docs(
        &self,
        doc_id: &str,
        max_hops: usize,
        limit: usize,
    ) -> MnemeResult<Vec<RelatedDoc>> {
        self.check_available()?;

        let all = self.doc_mentions();
        let seed_entities: HashSet<String> = all
            .iter()
            .find(|(id, _, _)| id == doc_id)
            .map(|(_, _, mentioned)| mentioned.iter().cloned().collect())
            .unwrap_or_default();

        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(doc_id.to_string());
        let mut frontier_entities = seed_entities;
        let mut related = Vec::new();

        // Breadth-first over the doc-entity bipartite graph: one hop is
        // doc -> shared entity -> doc.
        for distance in 1..=max_hops {
            let mut next_entities: HashSet<String> = HashSet::new();
            for (other_id, _, mentioned) in &all {
                if visited.contains(other_id) {
                    continue;
                }
                let shared: Vec<String> = mentioned
                    .iter()
                    .filter(|name| frontier_entities.contains(*name))
                    .cloned()
                    .collect();
                if shared.is_empty() {
                    continue;
                }
                visited.insert(other_id.clone());
                next_entities.extend(mentioned.iter().cloned());
                related.push(RelatedDoc {
                    doc_id: other_id.clone(),
                    distance,
                    score: shared.len() as f64,
                    shared_entities: shared,
                });
            }
            if next_entities.is_empty() {
                break;
            }
            frontier_entities = next_entities;
        }

        related.sort_by(|a, b| {
            a.distance.cmp(&b.distance).then_with(|| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
        });
        related.truncate(limit);
        Ok(related)
    }

    async fn delete_node(&self, node_id: &str) -> MnemeResult<bool> {
        self.check_available()?;
        let removed = self.nodes.remove(node_id).is_some();
        if removed {
            self.edges
                .retain(|(source, target, _), _| source != node_id && target != node_id);
            self.entities.retain(|_, id| id != node_id);
        }
        Ok(removed)
    }

    async fn execute_query(&self, _query: &str) -> MnemeResult<Vec<HashMap<String, Value>>> {
        self.check_available()?;
        // The mock speaks no query language.
        Ok(Vec::new())
    }
}

fn uuid_like(nodes: &DashMap<String, (String, HashMap<String, Value>)>) -> String {
    format!("n{}", nodes.len())
}
