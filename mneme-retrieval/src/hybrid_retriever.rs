//! Concurrent vector + graph recall fused with multi-dimensional weights.
//!
//! This is the one-call alternative to assembling a pipeline: both recall
//! legs run concurrently, either leg degrades to an empty contribution when
//! its store is unavailable, and the survivors are blended by
//! [`WeightedFusion`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use mneme_core::config::{FusionWeights, RetrievalConfig};
use mneme_core::constants::OVERFETCH_FACTOR;
use mneme_core::document::{Document, DocumentFilters};
use mneme_core::errors::MnemeResult;
use mneme_core::result::{sort_by_score, RetrievalResult};
use mneme_core::traits::{Embedder, MetadataStore, Tokenizer, VectorIndex};

use crate::fusion::WeightedFusion;
use crate::graph_retriever::{GraphRetriever, GraphRetrieverOptions};

pub struct HybridRetriever {
    vector: Arc<dyn VectorIndex>,
    metadata: Arc<dyn MetadataStore>,
    embedder: Arc<dyn Embedder>,
    graph_retriever: Arc<GraphRetriever>,
    tokenizer: Arc<dyn Tokenizer>,
    fusion: WeightedFusion,
    default_top_k: usize,
}

impl HybridRetriever {
    pub fn new(
        vector: Arc<dyn VectorIndex>,
        metadata: Arc<dyn MetadataStore>,
        embedder: Arc<dyn Embedder>,
        graph_retriever: Arc<GraphRetriever>,
        tokenizer: Arc<dyn Tokenizer>,
        weights: FusionWeights,
        decay_days: f64,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            vector,
            metadata,
            embedder,
            graph_retriever,
            tokenizer,
            fusion: WeightedFusion::new(weights, decay_days),
            default_top_k: config.top_k,
        }
    }

    pub fn with_boost_keywords(mut self, keywords: Vec<String>) -> Self {
        self.fusion = self.fusion.with_boost_keywords(keywords);
        self
    }

    pub async fn retrieve(&self, query: &str) -> MnemeResult<Vec<RetrievalResult>> {
        self.retrieve_top_k(query, self.default_top_k, &DocumentFilters::default())
            .await
    }

    pub async fn retrieve_top_k(
        &self,
        query: &str,
        top_k: usize,
        filters: &DocumentFilters,
    ) -> MnemeResult<Vec<RetrievalResult>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let fetch = top_k * OVERFETCH_FACTOR;

        let (vector_results, graph_results) =
            tokio::join!(self.vector_recall(query, fetch), async {
                let options = GraphRetrieverOptions {
                    filters: Some(filters.clone()),
                    ..Default::default()
                };
                match self
                    .graph_retriever
                    .retrieve_with_options(query, fetch, options)
                    .await
                {
                    Ok(results) => results,
                    Err(e) => {
                        warn!(error = %e, "graph recall unavailable, fusing vector side only");
                        Vec::new()
                    }
                }
            });

        // Hydrate and filter the vector leg; the graph leg comes back
        // hydrated and filtered by the retriever. Timestamps still cover
        // both legs for the time component.
        let ids: Vec<String> = vector_results
            .iter()
            .chain(graph_results.iter())
            .map(|r| r.doc_id.clone())
            .collect();
        let docs: HashMap<String, Document> = self
            .metadata
            .get_by_ids(&ids)
            .await?
            .into_iter()
            .map(|d| (d.id.clone(), d))
            .collect();
        let timestamps: HashMap<String, DateTime<Utc>> = docs
            .iter()
            .map(|(id, doc)| (id.clone(), doc.timestamp))
            .collect();

        let vector_results: Vec<RetrievalResult> = vector_results
            .into_iter()
            .filter_map(|mut r| {
                let doc = docs.get(&r.doc_id)?;
                if !filters.matches(doc) {
                    return None;
                }
                r.content = doc.content.clone();
                Some(r)
            })
            .collect();

        let mut fused = self.fusion.fuse(
            &vector_results,
            &graph_results,
            query,
            &timestamps,
            self.tokenizer.as_ref(),
            Utc::now(),
        );
        sort_by_score(&mut fused);
        fused.truncate(top_k);
        Ok(fused)
    }

    /// Vector leg: embedder or index failure degrades to no contribution.
    async fn vector_recall(&self, query: &str, fetch: usize) -> Vec<RetrievalResult> {
        let embedding = match self.embedder.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, "query embedding failed, fusing graph side only");
                return Vec::new();
            }
        };
        match self.vector.search(&embedding, fetch).await {
            Ok(matches) => matches
                .into_iter()
                .map(|m| {
                    RetrievalResult::new(
                        m.doc_id,
                        "",
                        m.score,
                        mneme_core::result::ResultSource::Vector,
                    )
                })
                .collect(),
            Err(e) => {
                warn!(error = %e, "vector index unavailable, fusing graph side only");
                Vec::new()
            }
        }
    }
}
