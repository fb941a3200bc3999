//! Dual-write orchestration across the vector index, the knowledge graph,
//! and the metadata store.
//!
//! Write protocol: side stores first (concurrently), metadata last. The
//! metadata row is the commit point; a document without one is invisible
//! to reads, so a failed side write leaves at worst an unreferenced orphan
//! in the other store. There is no compensating rollback.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, warn};

use mneme_core::config::LifecycleConfig;
use mneme_core::constants::OVERFETCH_FACTOR;
use mneme_core::document::{Document, DocumentFilters, DocumentStatus, DocumentUpdate};
use mneme_core::entity::{dedup_entities, Entity};
use mneme_core::errors::{MnemeError, MnemeResult, StorageError};
use mneme_core::result::{sort_by_score, ResultSource, RetrievalResult};
use mneme_core::traits::{
    Embedder, EntityExtractor, GraphStore, MetadataStore, VectorIndex, VectorIndexStats,
};

/// Vector index statistics plus per-layer document counts.
#[derive(Debug, Clone)]
pub struct RepositoryStats {
    pub vector: VectorIndexStats,
    pub total_documents: usize,
    pub hot: usize,
    pub warm: usize,
    pub cold: usize,
}

/// The hybrid memory repository.
pub struct MemoryRepository {
    pub(crate) vector: Arc<dyn VectorIndex>,
    pub(crate) graph: Arc<dyn GraphStore>,
    pub(crate) metadata: Arc<dyn MetadataStore>,
    pub(crate) embedder: Arc<dyn Embedder>,
    pub(crate) extractor: Arc<dyn EntityExtractor>,
    pub(crate) lifecycle: LifecycleConfig,
}

impl MemoryRepository {
    pub fn new(
        vector: Arc<dyn VectorIndex>,
        graph: Arc<dyn GraphStore>,
        metadata: Arc<dyn MetadataStore>,
        embedder: Arc<dyn Embedder>,
        extractor: Arc<dyn EntityExtractor>,
        lifecycle: LifecycleConfig,
    ) -> Self {
        Self {
            vector,
            graph,
            metadata,
            embedder,
            extractor,
            lifecycle,
        }
    }

    /// Store a document in all three stores.
    ///
    /// Embedding failure is fatal. Entity extraction failure degrades to an
    /// entity-less graph node with a warning. Either side write failing
    /// surfaces [`StorageError::PartialWrite`]; the metadata insert only
    /// happens once both sides committed, and flips the document to Active.
    pub async fn create(&self, doc: Document) -> MnemeResult<Document> {
        let mut doc = doc;

        let embedding = match doc.embedding.take() {
            Some(embedding) => embedding,
            None => self.embedder.embed(&doc.content).await?,
        };

        let entities = match self.extractor.extract(&doc.content).await {
            Ok(entities) => dedup_entities(entities),
            Err(e) => {
                warn!(doc_id = %doc.id, error = %e, "entity extraction failed, storing without entities");
                Vec::new()
            }
        };

        let vector_write = async {
            self.vector
                .add(&embedding, &doc.id)
                .await
                .map_err(|e| ("vector", e))
        };
        let graph_write = async {
            self.write_graph(&doc, &entities)
                .await
                .map_err(|e| ("graph", e))
        };

        let (vector_id, node_id) = tokio::try_join!(vector_write, graph_write).map_err(
            |(side, e): (&str, MnemeError)| StorageError::PartialWrite {
                doc_id: doc.id.clone(),
                failed_side: side.to_string(),
                reason: e.to_string(),
            },
        )?;

        doc.embedding = Some(embedding);
        doc.entities = entities.into_iter().map(|e| e.text).collect();
        doc.vector_index_id = Some(vector_id);
        doc.stored_in_vector = true;
        doc.graph_node_id = Some(node_id);
        doc.stored_in_graph = true;
        doc.status = DocumentStatus::Active;
        doc.updated_at = Utc::now();

        self.metadata.insert(&doc).await?;
        debug!(doc_id = %doc.id, entities = doc.entities.len(), "document committed");
        Ok(doc)
    }

    /// Graph side of a create: document node, merge-by-name entity upserts,
    /// confidence-weighted MENTIONS edges (merge-add on repeat).
    async fn write_graph(&self, doc: &Document, entities: &[Entity]) -> MnemeResult<String> {
        let mut props = HashMap::new();
        props.insert("id".to_string(), json!(doc.id));
        props.insert("doc_type".to_string(), json!(doc.doc_type));
        props.insert("timestamp".to_string(), json!(doc.timestamp.to_rfc3339()));
        let node_id = self.graph.create_node("Document", props).await?;

        for entity in entities {
            let mut meta = HashMap::new();
            meta.insert("confidence".to_string(), json!(entity.score));
            let entity_id = self
                .graph
                .upsert_entity(&entity.text, entity.entity_type, meta)
                .await?;
            self.graph
                .create_relation(&node_id, &entity_id, "MENTIONS", entity.score)
                .await?;
        }
        Ok(node_id)
    }

    pub async fn get(&self, doc_id: &str) -> MnemeResult<Option<Document>> {
        self.metadata.get(doc_id).await
    }

    pub async fn get_by_ids(&self, doc_ids: &[String]) -> MnemeResult<Vec<Document>> {
        self.metadata.get_by_ids(doc_ids).await
    }

    pub async fn list(&self, filters: &DocumentFilters) -> MnemeResult<Vec<Document>> {
        self.metadata.list(filters).await
    }

    /// Apply a patch. A content change re-embeds and swaps the vector
    /// entry (remove then add, not atomic). Returns `false` for unknown
    /// ids. Metadata replacement is last-writer-wins.
    pub async fn update(&self, doc_id: &str, update: DocumentUpdate) -> MnemeResult<bool> {
        let Some(existing) = self.metadata.get(doc_id).await? else {
            return Ok(false);
        };

        let mut update = update;
        if let Some(content) = update.content.clone() {
            if content != existing.content {
                let embedding = self.embedder.embed(&content).await?;
                self.vector.remove(doc_id).await?;
                let vector_id = self.vector.add(&embedding, doc_id).await?;
                update.embedding = Some(embedding);
                update.vector_index_id = Some(vector_id);
                update.stored_in_vector = Some(true);
                debug!(doc_id, "content changed, vector entry re-embedded");
            }
        }

        self.metadata.update(doc_id, &update).await
    }

    /// Remove a document from all stores. Returns `false` for unknown ids.
    /// Side removals run concurrently; the metadata row goes last.
    pub async fn delete(&self, doc_id: &str) -> MnemeResult<bool> {
        let Some(doc) = self.metadata.get(doc_id).await? else {
            return Ok(false);
        };

        let graph_node_id = doc.graph_node_id.clone();
        let (vector_removed, graph_removed) = tokio::join!(self.vector.remove(doc_id), async {
            match &graph_node_id {
                Some(node_id) => self.graph.delete_node(node_id).await,
                None => Ok(false),
            }
        });
        vector_removed?;
        graph_removed?;

        self.metadata.delete(doc_id).await
    }

    /// Weighted hybrid search over both recall paths.
    ///
    /// Both sides over-fetch 2×top_k concurrently; scores are fused by
    /// weighted sum keyed on doc_id (a missing side contributes 0).
    /// Candidates are hydrated before filtering so metadata filters apply
    /// to the fused set, then sorted descending with a doc_id tie-break
    /// and truncated. A side whose store is unavailable degrades to the
    /// other side with a warning.
    pub async fn hybrid_search(
        &self,
        query: &str,
        top_k: usize,
        vector_weight: f64,
        graph_weight: f64,
        filters: &DocumentFilters,
    ) -> MnemeResult<Vec<RetrievalResult>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let fetch = top_k * OVERFETCH_FACTOR;

        let (vector_hits, graph_hits) = tokio::join!(
            self.vector_recall(query, fetch),
            self.graph_recall(query, fetch)
        );

        #[derive(Default)]
        struct Sides {
            vector: Option<f64>,
            graph: Option<f64>,
        }
        let mut sides: HashMap<String, Sides> = HashMap::new();
        for (doc_id, score) in vector_hits {
            sides.entry(doc_id).or_default().vector = Some(score);
        }
        for (doc_id, score) in graph_hits {
            sides.entry(doc_id).or_default().graph = Some(score);
        }

        let ids: Vec<String> = sides.keys().cloned().collect();
        let docs: HashMap<String, Document> = self
            .metadata
            .get_by_ids(&ids)
            .await?
            .into_iter()
            .map(|d| (d.id.clone(), d))
            .collect();

        let mut results: Vec<RetrievalResult> = sides
            .into_iter()
            .filter_map(|(doc_id, side)| {
                // No metadata row means an orphan side write: invisible.
                let doc = docs.get(&doc_id)?;
                if !filters.matches(doc) {
                    return None;
                }
                let score = side.vector.unwrap_or(0.0) * vector_weight
                    + side.graph.unwrap_or(0.0) * graph_weight;
                let source = match (side.vector.is_some(), side.graph.is_some()) {
                    (true, true) => ResultSource::Hybrid,
                    (false, true) => ResultSource::Graph,
                    _ => ResultSource::Vector,
                };
                Some(RetrievalResult::new(doc_id, doc.content.clone(), score, source))
            })
            .collect();

        sort_by_score(&mut results);
        results.truncate(top_k);
        Ok(results)
    }

    /// Vector index stats plus per-layer document counts.
    pub async fn stats(&self) -> MnemeResult<RepositoryStats> {
        use mneme_core::document::DataLayer;

        let layer_filter = |layer: DataLayer| DocumentFilters {
            layer: Some(layer),
            ..Default::default()
        };
        let all_filter = DocumentFilters::default();
        let hot_filter = layer_filter(DataLayer::Hot);
        let warm_filter = layer_filter(DataLayer::Warm);
        let cold_filter = layer_filter(DataLayer::Cold);
        let (vector, total_documents, hot, warm, cold) = tokio::try_join!(
            self.vector.stats(),
            self.metadata.count(&all_filter),
            self.metadata.count(&hot_filter),
            self.metadata.count(&warm_filter),
            self.metadata.count(&cold_filter),
        )?;
        Ok(RepositoryStats {
            vector,
            total_documents,
            hot,
            warm,
            cold,
        })
    }

    /// Similarity recall: (doc_id, score) pairs, empty on store failure.
    async fn vector_recall(&self, query: &str, fetch: usize) -> Vec<(String, f64)> {
        let embedding = match self.embedder.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, "query embedding failed, searching graph side only");
                return Vec::new();
            }
        };
        match self.vector.search(&embedding, fetch).await {
            Ok(matches) => matches.into_iter().map(|m| (m.doc_id, m.score)).collect(),
            Err(e) => {
                warn!(error = %e, "vector index unavailable, searching graph side only");
                Vec::new()
            }
        }
    }

    /// Entity recall: score is the fraction of query entities a document
    /// mentions, empty when the query has no known entities or the store
    /// is unavailable.
    async fn graph_recall(&self, query: &str, fetch: usize) -> Vec<(String, f64)> {
        let entities = match self.extractor.extract(query).await {
            Ok(entities) => dedup_entities(entities),
            Err(e) => {
                warn!(error = %e, "query entity extraction failed, searching vector side only");
                return Vec::new();
            }
        };
        if entities.is_empty() {
            return Vec::new();
        }
        let names: Vec<String> = entities.into_iter().map(|e| e.text).collect();
        let total = names.len() as f64;

        match self.graph.search_by_entities(&names, fetch).await {
            Ok(matches) => matches
                .into_iter()
                .map(|m| (m.doc_id, m.score / total))
                .collect(),
            Err(e) => {
                warn!(error = %e, "graph store unavailable, searching vector side only");
                Vec::new()
            }
        }
    }
}
