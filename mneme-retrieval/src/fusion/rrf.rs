//! Reciprocal Rank Fusion: score = Σ_source 1/(k + rank_in_source).
//!
//! Combines ranked lists from different retrieval methods without
//! requiring score normalization across them. A doc_id absent from a
//! source simply contributes nothing for that source.

use std::collections::{HashMap, HashSet};

use mneme_core::result::{sort_by_score, ResultSource, RetrievalResult};

/// Fuse a mixed candidate list by grouping on source tag.
///
/// Each source's candidates keep their relative order, ranks start at 1.
/// A doc_id repeated under the same source counts once, at its first
/// position. The first occurrence of a doc_id supplies content and
/// metadata; results present in more than one source are retagged
/// `hybrid`. Output is sorted by fused score descending with a doc_id
/// tie-break, so identical inputs always produce identical order.
pub fn fuse(candidates: &[RetrievalResult], k: u32) -> Vec<RetrievalResult> {
    // Drop repeats of a (source, doc_id) pair, keeping the first.
    let mut seen: HashSet<(ResultSource, &str)> = HashSet::new();
    let candidates: Vec<&RetrievalResult> = candidates
        .iter()
        .filter(|c| seen.insert((c.source, c.doc_id.as_str())))
        .collect();

    // Partition into per-source rank lists, preserving order of appearance.
    let mut by_source: HashMap<ResultSource, Vec<&RetrievalResult>> = HashMap::new();
    for candidate in &candidates {
        by_source.entry(candidate.source).or_default().push(*candidate);
    }

    struct Fused {
        result: RetrievalResult,
        sources: usize,
    }
    let mut fused: HashMap<String, Fused> = HashMap::new();
    // Iterate candidates in input order so "first occurrence" is stable,
    // but take ranks from the per-source partitions.
    let mut rank_of: HashMap<(ResultSource, String), usize> = HashMap::new();
    for (source, list) in &by_source {
        for (i, candidate) in list.iter().enumerate() {
            rank_of.insert((*source, candidate.doc_id.clone()), i + 1);
        }
    }

    for candidate in candidates {
        let rank = rank_of[&(candidate.source, candidate.doc_id.clone())];
        let contribution = 1.0 / (k as f64 + rank as f64);
        match fused.get_mut(&candidate.doc_id) {
            Some(entry) => {
                entry.result.score += contribution;
                entry.sources += 1;
            }
            None => {
                let mut result = candidate.clone();
                result.score = contribution;
                fused.insert(
                    candidate.doc_id.clone(),
                    Fused { result, sources: 1 },
                );
            }
        }
    }

    let mut results: Vec<RetrievalResult> = fused
        .into_values()
        .map(|entry| {
            let mut result = entry.result;
            if entry.sources > 1 {
                result.source = ResultSource::Hybrid;
            }
            result
        })
        .collect();
    sort_by_score(&mut results);
    results
}
