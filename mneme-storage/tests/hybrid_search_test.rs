//! Weighted hybrid search: fusion math, source tagging, filters, and
//! per-side degradation.

use std::sync::Arc;

use mneme_core::config::LifecycleConfig;
use mneme_core::document::{Document, DocumentFilters, DocumentType};
use mneme_core::result::ResultSource;
use mneme_core::traits::VectorMatch;
use mneme_storage::MemoryRepository;
use test_fixtures::{
    MockEmbedder, MockEntityExtractor, MockGraphStore, MockMetadataStore, MockVectorIndex,
};

// ============================================================================
// Helpers
// ============================================================================

const VOCAB: [(&str, f64); 5] = [
    ("alpha", 0.9),
    ("bravo", 0.9),
    ("charlie", 0.9),
    ("delta", 0.9),
    ("echo", 0.9),
];

struct Fixture {
    vector: Arc<MockVectorIndex>,
    graph: Arc<MockGraphStore>,
    repo: MemoryRepository,
}

impl Fixture {
    fn new() -> Self {
        let vector = Arc::new(MockVectorIndex::new(8));
        let graph = Arc::new(MockGraphStore::new());
        let repo = MemoryRepository::new(
            vector.clone(),
            graph.clone(),
            Arc::new(MockMetadataStore::new()),
            Arc::new(MockEmbedder::default()),
            Arc::new(MockEntityExtractor::with_topics(&VOCAB)),
            LifecycleConfig::default(),
        );
        Self {
            vector,
            graph,
            repo,
        }
    }

    /// Create a document and return its id.
    async fn create(&self, content: &str, doc_type: DocumentType) -> String {
        self.repo
            .create(Document::new(content, doc_type))
            .await
            .unwrap()
            .id
    }
}

/// doc A: similarity hit only. doc B: mentions 4 of the 5 query entities.
async fn two_sided_fixture() -> (Fixture, String, String) {
    let fixture = Fixture::new();
    let a = fixture
        .create("unrelated musings on memory systems", DocumentType::Note)
        .await;
    let b = fixture
        .create("alpha bravo charlie delta", DocumentType::Note)
        .await;
    fixture.vector.script_search(vec![VectorMatch {
        doc_id: a.clone(),
        score: 0.9,
    }]);
    (fixture, a, b)
}

// ============================================================================
// Fusion math
// ============================================================================

#[tokio::test]
async fn weighted_sum_fuses_both_sides_with_missing_side_as_zero() {
    let (fixture, a, b) = two_sided_fixture().await;

    let results = fixture
        .repo
        .hybrid_search(
            "alpha bravo charlie delta echo",
            5,
            0.6,
            0.4,
            &DocumentFilters::default(),
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].doc_id, a);
    assert!((results[0].score - 0.54).abs() < 1e-9);
    assert_eq!(results[0].source, ResultSource::Vector);

    assert_eq!(results[1].doc_id, b);
    assert!((results[1].score - 0.32).abs() < 1e-9);
    assert_eq!(results[1].source, ResultSource::Graph);
}

#[tokio::test]
async fn extreme_vector_weight_reproduces_vector_order() {
    let (fixture, a, _b) = two_sided_fixture().await;

    let results = fixture
        .repo
        .hybrid_search(
            "alpha bravo charlie delta echo",
            5,
            1.0,
            0.0,
            &DocumentFilters::default(),
        )
        .await
        .unwrap();

    assert_eq!(results[0].doc_id, a);
    assert!((results[0].score - 0.9).abs() < 1e-9);
    assert_eq!(results[1].score, 0.0);
}

#[tokio::test]
async fn doc_found_by_both_sides_is_tagged_hybrid() {
    let (fixture, a, b) = two_sided_fixture().await;
    fixture.vector.script_search(vec![
        VectorMatch {
            doc_id: a.clone(),
            score: 0.9,
        },
        VectorMatch {
            doc_id: b.clone(),
            score: 0.5,
        },
    ]);

    let results = fixture
        .repo
        .hybrid_search(
            "alpha bravo charlie delta echo",
            5,
            0.6,
            0.4,
            &DocumentFilters::default(),
        )
        .await
        .unwrap();

    let b_result = results.iter().find(|r| r.doc_id == b).unwrap();
    assert_eq!(b_result.source, ResultSource::Hybrid);
    // 0.5 × 0.6 + 0.8 × 0.4
    assert!((b_result.score - 0.62).abs() < 1e-9);
}

// ============================================================================
// Filters, blanks, truncation
// ============================================================================

#[tokio::test]
async fn blank_query_returns_empty() {
    let fixture = Fixture::new();
    let results = fixture
        .repo
        .hybrid_search("   ", 5, 0.6, 0.4, &DocumentFilters::default())
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn metadata_filters_apply_to_the_fused_set() {
    let (fixture, a, _b) = two_sided_fixture().await;

    let filters = DocumentFilters {
        doc_type: Some(DocumentType::Event),
        ..Default::default()
    };
    let results = fixture
        .repo
        .hybrid_search("alpha bravo charlie delta echo", 5, 0.6, 0.4, &filters)
        .await
        .unwrap();
    assert!(results.is_empty());

    let filters = DocumentFilters {
        doc_type: Some(DocumentType::Note),
        ..Default::default()
    };
    let results = fixture
        .repo
        .hybrid_search("alpha bravo charlie delta echo", 5, 0.6, 0.4, &filters)
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].doc_id, a);
}

#[tokio::test]
async fn orphan_vector_ids_are_invisible() {
    let fixture = Fixture::new();
    fixture.vector.script_search(vec![VectorMatch {
        doc_id: "orphan".to_string(),
        score: 0.99,
    }]);

    let results = fixture
        .repo
        .hybrid_search("anything", 5, 0.6, 0.4, &DocumentFilters::default())
        .await
        .unwrap();
    assert!(results.is_empty());
}

// ============================================================================
// Per-side degradation
// ============================================================================

#[tokio::test]
async fn vector_outage_degrades_to_graph_side() {
    let (fixture, _a, b) = two_sided_fixture().await;
    fixture.vector.set_unavailable(true);

    let results = fixture
        .repo
        .hybrid_search(
            "alpha bravo charlie delta echo",
            5,
            0.6,
            0.4,
            &DocumentFilters::default(),
        )
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].doc_id, b);
    assert_eq!(results[0].source, ResultSource::Graph);
}

#[tokio::test]
async fn graph_outage_degrades_to_vector_side() {
    let (fixture, a, _b) = two_sided_fixture().await;
    fixture.graph.set_unavailable(true);

    let results = fixture
        .repo
        .hybrid_search(
            "alpha bravo charlie delta echo",
            5,
            0.6,
            0.4,
            &DocumentFilters::default(),
        )
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].doc_id, a);
    assert_eq!(results[0].source, ResultSource::Vector);
}

#[tokio::test]
async fn query_without_known_entities_searches_vector_only() {
    let fixture = Fixture::new();
    let a = fixture.create("plain note", DocumentType::Note).await;
    fixture.vector.script_search(vec![VectorMatch {
        doc_id: a.clone(),
        score: 0.7,
    }]);

    let results = fixture
        .repo
        .hybrid_search("nothing entity shaped", 5, 0.6, 0.4, &DocumentFilters::default())
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].source, ResultSource::Vector);
}
