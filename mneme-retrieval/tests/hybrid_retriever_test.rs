//! One-call hybrid retrieval: concurrent recall, multi-dimensional
//! fusion, and per-leg degradation.

use std::collections::HashMap;
use std::sync::Arc;

use mneme_core::config::{FusionWeights, RetrievalConfig};
use mneme_core::document::{DocumentFilters, DocumentType};
use mneme_core::result::ResultSource;
use mneme_core::traits::{GraphStore, MetadataStore, VectorMatch};
use mneme_retrieval::{GraphRetriever, HybridRetriever, SimpleTokenizer};
use serde_json::json;
use test_fixtures::{
    aged_document, MockEmbedder, MockEntityExtractor, MockGraphStore, MockMetadataStore,
    MockVectorIndex,
};

// ============================================================================
// Helpers
// ============================================================================

struct Fixture {
    vector: Arc<MockVectorIndex>,
    graph: Arc<MockGraphStore>,
    metadata: Arc<MockMetadataStore>,
    embedder: Arc<MockEmbedder>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            vector: Arc::new(MockVectorIndex::new(8)),
            graph: Arc::new(MockGraphStore::new()),
            metadata: Arc::new(MockMetadataStore::new()),
            embedder: Arc::new(MockEmbedder::default()),
        }
    }

    fn retriever(&self, weights: FusionWeights) -> HybridRetriever {
        let graph_retriever = Arc::new(GraphRetriever::new(
            self.graph.clone(),
            self.metadata.clone(),
            Arc::new(MockEntityExtractor::with_topics(&[("alpha", 0.9)])),
            Arc::new(SimpleTokenizer),
            &RetrievalConfig::default(),
        ));
        HybridRetriever::new(
            self.vector.clone(),
            self.metadata.clone(),
            self.embedder.clone(),
            graph_retriever,
            Arc::new(SimpleTokenizer),
            weights,
            365.0,
            &RetrievalConfig::default(),
        )
    }

    /// Store an aged document and optionally register graph mentions.
    async fn seed(&self, doc_id: &str, content: &str, days_old: i64, entities: &[&str]) {
        let mut doc = aged_document(content, days_old, 0.5);
        doc.id = doc_id.to_string();
        self.metadata.insert(&doc).await.unwrap();

        if !entities.is_empty() {
            let mut props = HashMap::new();
            props.insert("id".to_string(), json!(doc_id));
            let node_id = self.graph.create_node("Document", props).await.unwrap();
            for name in entities {
                let entity_id = self
                    .graph
                    .upsert_entity(name, mneme_core::entity::EntityType::Topic, HashMap::new())
                    .await
                    .unwrap();
                self.graph
                    .create_relation(&node_id, &entity_id, "MENTIONS", 1.0)
                    .await
                    .unwrap();
            }
        }
    }
}

// ============================================================================
// Fusion
// ============================================================================

#[tokio::test]
async fn blank_query_returns_empty() {
    let fixture = Fixture::new();
    let retriever = fixture.retriever(FusionWeights::default());
    assert!(retriever.retrieve("").await.unwrap().is_empty());
}

#[tokio::test]
async fn fuses_both_legs_and_records_component_scores() {
    let fixture = Fixture::new();
    fixture.seed("doc-v", "memory system notes", 0, &[]).await;
    fixture.seed("doc-g", "alpha protocol", 0, &["alpha"]).await;
    fixture.vector.script_search(vec![VectorMatch {
        doc_id: "doc-v".to_string(),
        score: 0.9,
    }]);

    let retriever = fixture.retriever(FusionWeights::new(0.6, 0.4, 0.0, 0.0));
    let results = retriever.retrieve("alpha").await.unwrap();

    assert_eq!(results.len(), 2);
    // doc-v: 0.9 × 0.6; doc-g: batch-max-normalized 1.0 × 0.4.
    assert_eq!(results[0].doc_id, "doc-v");
    assert!((results[0].score - 0.54).abs() < 1e-9);
    assert_eq!(results[1].doc_id, "doc-g");
    assert!((results[1].score - 0.4).abs() < 1e-9);

    assert_eq!(results[0].source, ResultSource::Hybrid);
    assert!(results[0].metadata.contains_key("vector_score"));
    assert!(results[0].metadata.contains_key("time_score"));
}

#[tokio::test]
async fn time_weight_prefers_recent_documents() {
    let fixture = Fixture::new();
    fixture.seed("doc-old", "stale entry", 1800, &[]).await;
    fixture.seed("doc-new", "fresh entry", 0, &[]).await;
    fixture.vector.script_search(vec![
        VectorMatch {
            doc_id: "doc-old".to_string(),
            score: 0.9,
        },
        VectorMatch {
            doc_id: "doc-new".to_string(),
            score: 0.9,
        },
    ]);

    let retriever = fixture.retriever(FusionWeights::new(0.0, 0.0, 0.0, 1.0));
    let results = retriever.retrieve("entry").await.unwrap();

    assert_eq!(results[0].doc_id, "doc-new");
    assert!(results[0].score > results[1].score);
}

#[tokio::test]
async fn keyword_component_rewards_token_overlap() {
    let fixture = Fixture::new();
    fixture.seed("doc-hit", "kernel scheduling latency", 0, &[]).await;
    fixture.seed("doc-miss", "gardening tips", 0, &[]).await;
    fixture.vector.script_search(vec![
        VectorMatch {
            doc_id: "doc-miss".to_string(),
            score: 0.5,
        },
        VectorMatch {
            doc_id: "doc-hit".to_string(),
            score: 0.5,
        },
    ]);

    let retriever = fixture.retriever(FusionWeights::new(0.0, 0.0, 1.0, 0.0));
    let results = retriever.retrieve("kernel latency").await.unwrap();

    assert_eq!(results[0].doc_id, "doc-hit");
    assert!(results[1].score < results[0].score);
}

#[tokio::test]
async fn filters_apply_to_both_recall_legs() {
    let fixture = Fixture::new();
    fixture.seed("doc-v", "vector note", 0, &[]).await;
    fixture.seed("doc-g", "alpha protocol", 0, &["alpha"]).await;

    let mut decision = aged_document("alpha decision record", 0, 0.5);
    decision.id = "doc-d".to_string();
    decision.doc_type = DocumentType::Decision;
    fixture.metadata.insert(&decision).await.unwrap();
    fixture.vector.script_search(vec![
        VectorMatch {
            doc_id: "doc-v".to_string(),
            score: 0.9,
        },
        VectorMatch {
            doc_id: "doc-d".to_string(),
            score: 0.8,
        },
    ]);

    let retriever = fixture.retriever(FusionWeights::default());
    let filters = DocumentFilters {
        doc_type: Some(DocumentType::Decision),
        ..Default::default()
    };
    let results = retriever.retrieve_top_k("alpha", 10, &filters).await.unwrap();

    // doc-v (vector leg) and doc-g (graph leg) are both Notes.
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].doc_id, "doc-d");
}

// ============================================================================
// Degradation
// ============================================================================

#[tokio::test]
async fn embedder_outage_degrades_to_graph_leg() {
    let fixture = Fixture::new();
    fixture.seed("doc-g", "alpha protocol", 0, &["alpha"]).await;
    fixture.embedder.set_failing(true);

    let retriever = fixture.retriever(FusionWeights::default());
    let results = retriever.retrieve("alpha").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].doc_id, "doc-g");
}

#[tokio::test]
async fn graph_outage_degrades_to_vector_leg() {
    let fixture = Fixture::new();
    fixture.seed("doc-v", "plain note", 0, &[]).await;
    fixture.vector.script_search(vec![VectorMatch {
        doc_id: "doc-v".to_string(),
        score: 0.8,
    }]);
    fixture.graph.set_unavailable(true);

    let retriever = fixture.retriever(FusionWeights::default());
    let results = retriever.retrieve("alpha").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].doc_id, "doc-v");
}
