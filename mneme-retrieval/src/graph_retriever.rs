//! Entity-driven retrieval over the graph store with bounded multi-hop
//! expansion.
//!
//! An empty result set is the explicit contract for "no entities in the
//! query" — the caller should fall back to vector-only retrieval, this is
//! never an error.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use mneme_core::config::RetrievalConfig;
use mneme_core::constants::{MAX_SEED_EXPANSION, OVERFETCH_FACTOR, RELATED_DOC_LIMIT};
use mneme_core::document::{Document, DocumentFilters};
use mneme_core::errors::MnemeResult;
use mneme_core::result::{sort_by_score, ResultSource, RetrievalResult};
use mneme_core::traits::{EntityExtractor, GraphStore, MetadataStore, Tokenizer};

/// Per-call overrides: multi-hop behavior and metadata filtering.
#[derive(Debug, Clone, Default)]
pub struct GraphRetrieverOptions {
    pub enable_multi_hop: Option<bool>,
    pub max_hops: Option<usize>,
    /// Applied to hydrated candidates before truncation.
    pub filters: Option<DocumentFilters>,
}

/// Graph retriever: query entities → mentioned documents → related
/// documents via shared-entity traversal, hydrated from metadata.
pub struct GraphRetriever {
    graph: Arc<dyn GraphStore>,
    metadata: Arc<dyn MetadataStore>,
    extractor: Arc<dyn EntityExtractor>,
    tokenizer: Arc<dyn Tokenizer>,
    enable_multi_hop: bool,
    max_hops: usize,
    hop_decay: f64,
}

impl GraphRetriever {
    pub fn new(
        graph: Arc<dyn GraphStore>,
        metadata: Arc<dyn MetadataStore>,
        extractor: Arc<dyn EntityExtractor>,
        tokenizer: Arc<dyn Tokenizer>,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            graph,
            metadata,
            extractor,
            tokenizer,
            enable_multi_hop: config.enable_multi_hop,
            max_hops: config.max_hops,
            hop_decay: config.hop_decay,
        }
    }

    /// Retrieve with the configured multi-hop defaults and no filters.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> MnemeResult<Vec<RetrievalResult>> {
        self.retrieve_with_options(query, top_k, GraphRetrieverOptions::default())
            .await
    }

    pub async fn retrieve_with_options(
        &self,
        query: &str,
        top_k: usize,
        options: GraphRetrieverOptions,
    ) -> MnemeResult<Vec<RetrievalResult>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let entities = self.extract_entities(query).await;
        if entities.is_empty() {
            debug!(query, "no entities in query, signaling vector-only fallback");
            return Ok(Vec::new());
        }
        debug!(count = entities.len(), "extracted query entities");

        let matches = self
            .graph
            .search_by_entities(&entities, top_k * OVERFETCH_FACTOR)
            .await?;
        if matches.is_empty() {
            debug!("entity search found no documents");
            return Ok(Vec::new());
        }

        // Normalize raw match counts against the batch maximum.
        let max_score = matches
            .iter()
            .map(|m| m.score)
            .fold(f64::MIN, f64::max)
            .max(f64::EPSILON);

        let mut results: Vec<RetrievalResult> = matches
            .into_iter()
            .map(|m| {
                RetrievalResult::new(m.doc_id, "", m.score / max_score, ResultSource::Graph)
                    .with_meta("matched_entities", json!(m.matched_entities))
            })
            .collect();

        let enable_multi_hop = options.enable_multi_hop.unwrap_or(self.enable_multi_hop);
        if enable_multi_hop {
            let max_hops = options.max_hops.unwrap_or(self.max_hops);
            results = self.expand_multi_hop(results, max_hops).await;
        }

        let mut results = self.hydrate(results, options.filters.as_ref()).await?;
        sort_by_score(&mut results);
        results.truncate(top_k);
        Ok(results)
    }

    /// Extract entity texts, falling back to the tokenizer when the
    /// extractor fails or finds nothing.
    async fn extract_entities(&self, query: &str) -> Vec<String> {
        match self.extractor.extract(query).await {
            Ok(entities) if !entities.is_empty() => {
                entities.into_iter().map(|e| e.text).collect()
            }
            Ok(_) => self.tokenizer.tokenize(query),
            Err(e) => {
                warn!(error = %e, "entity extraction failed, using tokenizer fallback");
                self.tokenizer.tokenize(query)
            }
        }
    }

    /// Expand the top seeds through shared-entity traversal. A related doc
    /// at hop distance d scores `seed × decay^d`; the first occurrence of a
    /// doc_id wins (seed order), later seeds never overwrite it.
    async fn expand_multi_hop(
        &self,
        initial: Vec<RetrievalResult>,
        max_hops: usize,
    ) -> Vec<RetrievalResult> {
        let mut seen: HashSet<String> = initial.iter().map(|r| r.doc_id.clone()).collect();
        let mut expanded = initial.clone();

        for seed in initial.iter().take(MAX_SEED_EXPANSION) {
            let related = match self
                .graph
                .find_related_docs(&seed.doc_id, max_hops, RELATED_DOC_LIMIT)
                .await
            {
                Ok(related) => related,
                Err(e) => {
                    warn!(seed = %seed.doc_id, error = %e, "multi-hop expansion failed for seed");
                    continue;
                }
            };

            for doc in related {
                if !seen.insert(doc.doc_id.clone()) {
                    continue;
                }
                let score = seed.score * self.hop_decay.powi(doc.distance as i32);
                expanded.push(
                    RetrievalResult::new(doc.doc_id, "", score, ResultSource::GraphExpanded)
                        .with_meta("hop_distance", json!(doc.distance))
                        .with_meta("base_doc_id", json!(seed.doc_id))
                        .with_meta("shared_entities", json!(doc.shared_entities)),
                );
            }
        }

        debug!(
            seeds = initial.len().min(MAX_SEED_EXPANSION),
            total = expanded.len(),
            "multi-hop expansion complete"
        );
        expanded
    }

    /// Fill in content from metadata and apply filters. Graph nodes whose
    /// doc_id has no metadata row are orphan side writes and are dropped.
    async fn hydrate(
        &self,
        results: Vec<RetrievalResult>,
        filters: Option<&DocumentFilters>,
    ) -> MnemeResult<Vec<RetrievalResult>> {
        let ids: Vec<String> = results.iter().map(|r| r.doc_id.clone()).collect();
        let docs: HashMap<String, Document> = self
            .metadata
            .get_by_ids(&ids)
            .await?
            .into_iter()
            .map(|d| (d.id.clone(), d))
            .collect();

        Ok(results
            .into_iter()
            .filter_map(|mut result| {
                let doc = docs.get(&result.doc_id)?;
                if let Some(filters) = filters {
                    if !filters.matches(doc) {
                        return None;
                    }
                }
                result.content = doc.content.clone();
                Some(result)
            })
            .collect())
    }
}
