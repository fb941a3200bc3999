//! Property tests for score fusion: determinism, bounds, and weight
//! normalization invariants.

use std::collections::HashMap;

use chrono::Utc;
use mneme_core::config::FusionWeights;
use mneme_core::result::{ResultSource, RetrievalResult};
use mneme_retrieval::fusion::{rrf, WeightedFusion};
use mneme_retrieval::SimpleTokenizer;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// A mixed candidate list with unique (source, doc_id) pairs.
fn candidate_list() -> impl Strategy<Value = Vec<RetrievalResult>> {
    prop::collection::hash_set((0u8..8, prop::bool::ANY), 0..12).prop_flat_map(|pairs| {
        let pairs: Vec<(u8, bool)> = pairs.into_iter().collect();
        let len = pairs.len();
        (
            Just(pairs),
            prop::collection::vec(0.0f64..1.0, len..=len),
        )
            .prop_map(|(pairs, scores)| {
                pairs
                    .into_iter()
                    .zip(scores)
                    .map(|((id, graph_side), score)| {
                        let source = if graph_side {
                            ResultSource::Graph
                        } else {
                            ResultSource::Vector
                        };
                        RetrievalResult::new(format!("doc-{id}"), "", score, source)
                    })
                    .collect()
            })
    })
}

fn result_list(source: ResultSource) -> impl Strategy<Value = Vec<RetrievalResult>> {
    prop::collection::hash_set(0u8..8, 0..8).prop_flat_map(move |ids| {
        let ids: Vec<u8> = ids.into_iter().collect();
        let len = ids.len();
        (Just(ids), prop::collection::vec(0.0f64..1.0, len..=len)).prop_map(move |(ids, scores)| {
            ids.into_iter()
                .zip(scores)
                .map(|(id, score)| {
                    RetrievalResult::new(format!("doc-{id}"), format!("content {id}"), score, source)
                })
                .collect()
        })
    })
}

// ============================================================================
// Reciprocal rank fusion
// ============================================================================

proptest! {
    #[test]
    fn rrf_is_deterministic(candidates in candidate_list(), k in 1u32..200) {
        let first = rrf::fuse(&candidates, k);
        let second = rrf::fuse(&candidates, k);
        let ids_a: Vec<&str> = first.iter().map(|r| r.doc_id.as_str()).collect();
        let ids_b: Vec<&str> = second.iter().map(|r| r.doc_id.as_str()).collect();
        prop_assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn rrf_scores_are_positive_and_bounded(candidates in candidate_list(), k in 1u32..200) {
        let fused = rrf::fuse(&candidates, k);
        // A doc_id appears in at most two sources, each contributing at
        // most 1/(k+1).
        let cap = 2.0 / (k as f64 + 1.0);
        for result in &fused {
            prop_assert!(result.score > 0.0);
            prop_assert!(result.score <= cap + 1e-12);
        }
    }

    #[test]
    fn rrf_output_is_sorted_and_deduplicated(candidates in candidate_list(), k in 1u32..200) {
        let fused = rrf::fuse(&candidates, k);
        for window in fused.windows(2) {
            prop_assert!(window[0].score >= window[1].score);
        }
        let mut ids: Vec<&str> = fused.iter().map(|r| r.doc_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), fused.len());
    }
}

// ============================================================================
// Weighted fusion
// ============================================================================

proptest! {
    #[test]
    fn weighted_fusion_scores_stay_in_unit_interval(
        vector in result_list(ResultSource::Vector),
        graph in result_list(ResultSource::Graph),
        vw in 0.0f64..2.0,
        gw in 0.0f64..2.0,
        kw in 0.0f64..2.0,
        tw in 0.0f64..2.0,
    ) {
        let fusion = WeightedFusion::new(
            FusionWeights { vector: vw, graph: gw, keyword: kw, time: tw },
            365.0,
        );
        let fused = fusion.fuse(
            &vector,
            &graph,
            "content query",
            &HashMap::new(),
            &SimpleTokenizer,
            Utc::now(),
        );
        // Normalized weights sum to 1 and every component is in [0, 1].
        for result in &fused {
            prop_assert!(result.score >= 0.0);
            prop_assert!(result.score <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn weighted_fusion_emits_each_doc_once(
        vector in result_list(ResultSource::Vector),
        graph in result_list(ResultSource::Graph),
    ) {
        let fusion = WeightedFusion::new(FusionWeights::default(), 365.0);
        let fused = fusion.fuse(
            &vector,
            &graph,
            "query",
            &HashMap::new(),
            &SimpleTokenizer,
            Utc::now(),
        );
        let mut ids: Vec<&str> = fused.iter().map(|r| r.doc_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), fused.len());
        prop_assert!(fused.iter().all(|r| r.source == ResultSource::Hybrid));
    }
}
