use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use mneme_core::constants::OVERFETCH_FACTOR;
use mneme_core::document::Document;
use mneme_core::errors::MnemeResult;
use mneme_core::result::{ResultSource, RetrievalResult};
use mneme_core::traits::{Embedder, MetadataStore, VectorIndex};

use crate::pipeline::PipelineContext;
use crate::stages::Stage;

/// Source stage: nearest-neighbor recall over the vector index,
/// hydrated with document content for downstream token-based stages.
/// Scores are scaled by the context's vector weight; context filters
/// apply to the hydrated candidates.
///
/// Embedder or index unavailability degrades to an empty contribution
/// with a warning; the remaining stages still run.
pub struct VectorStage {
    index: Arc<dyn VectorIndex>,
    metadata: Arc<dyn MetadataStore>,
    embedder: Arc<dyn Embedder>,
}

impl VectorStage {
    pub fn new(
        index: Arc<dyn VectorIndex>,
        metadata: Arc<dyn MetadataStore>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            index,
            metadata,
            embedder,
        }
    }
}

#[async_trait]
impl Stage for VectorStage {
    async fn process(
        &self,
        query: &str,
        _previous: Option<&[RetrievalResult]>,
        ctx: &mut PipelineContext,
    ) -> MnemeResult<Vec<RetrievalResult>> {
        let embedding = match self.embedder.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, "query embedding failed, vector recall degraded to empty");
                return Ok(Vec::new());
            }
        };

        let matches = match self
            .index
            .search(&embedding, ctx.top_k * OVERFETCH_FACTOR)
            .await
        {
            Ok(matches) => matches,
            Err(e) => {
                warn!(error = %e, "vector index unavailable, degrading to empty contribution");
                return Ok(Vec::new());
            }
        };

        // Hydrate content; orphan ids without a metadata row are dropped.
        let ids: Vec<String> = matches.iter().map(|m| m.doc_id.clone()).collect();
        let docs: HashMap<String, Document> = self
            .metadata
            .get_by_ids(&ids)
            .await?
            .into_iter()
            .map(|d| (d.id.clone(), d))
            .collect();

        Ok(matches
            .into_iter()
            .filter_map(|m| {
                let doc = docs.get(&m.doc_id)?;
                if !ctx.filters.matches(doc) {
                    return None;
                }
                Some(
                    RetrievalResult::new(
                        m.doc_id,
                        doc.content.clone(),
                        m.score * ctx.vector_weight,
                        ResultSource::Vector,
                    )
                    .with_meta("timestamp", json!(doc.timestamp.to_rfc3339())),
                )
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "vector_retrieval"
    }
}
