use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::DashMap;

use mneme_core::errors::{MnemeResult, StorageError};
use mneme_core::traits::{VectorIndex, VectorIndexStats, VectorMatch};

/// In-memory vector index with cosine-similarity search.
///
/// Tests that need exact scores can install scripted search results via
/// [`MockVectorIndex::script_search`], bypassing the similarity math.
pub struct MockVectorIndex {
    vectors: DashMap<String, (i64, Vec<f32>)>,
    next_id: AtomicI64,
    unavailable: AtomicBool,
    scripted: Mutex<Option<Vec<VectorMatch>>>,
    dimensions: usize,
}

impl MockVectorIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            vectors: DashMap::new(),
            next_id: AtomicI64::new(0),
            unavailable: AtomicBool::new(false),
            scripted: Mutex::new(None),
            dimensions,
        }
    }

    /// Make every call fail with `VectorUnavailable` until cleared.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Pin the result list returned by `search`, regardless of stored vectors.
    pub fn script_search(&self, results: Vec<VectorMatch>) {
        *self.scripted.lock().unwrap() = Some(results);
    }

    pub fn contains(&self, doc_id: &str) -> bool {
        self.vectors.contains_key(doc_id)
    }

    fn check_available(&self) -> MnemeResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::VectorUnavailable {
                reason: "mock index offline".to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn cosine(a: &[f32], b: &[f32]) -> f64 {
        let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if na == 0.0 || nb == 0.0 {
            return 0.0;
        }
        (dot / (na * nb)) as f64
    }
}

#[async_trait]
impl VectorIndex for MockVectorIndex {
    async fn add(&self, embedding: &[f32], doc_id: &str) -> MnemeResult<i64> {
        self.check_available()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.vectors
            .insert(doc_id.to_string(), (id, embedding.to_vec()));
        Ok(id)
    }

    async fn add_batch(
        &self,
        embeddings: &[Vec<f32>],
        doc_ids: &[String],
    ) -> MnemeResult<Vec<i64>> {
        self.check_available()?;
        let mut ids = Vec::with_capacity(doc_ids.len());
        for (embedding, doc_id) in embeddings.iter().zip(doc_ids) {
            ids.push(self.add(embedding, doc_id).await?);
        }
        Ok(ids)
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> MnemeResult<Vec<VectorMatch>> {
        self.check_available()?;

        if let Some(scripted) = self.scripted.lock().unwrap().clone() {
            return Ok(scripted.into_iter().take(top_k).collect());
        }

        let mut matches: Vec<VectorMatch> = self
            .vectors
            .iter()
            .map(|entry| VectorMatch {
                doc_id: entry.key().clone(),
                score: Self::cosine(embedding, &entry.value().1),
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

    async fn remove(&self, doc_id: &str) -> MnemeResult<bool> {
        self.check_available()?;
        Ok(self.vectors.remove(doc_id).is_some())
    }

    async fn stats(&self) -> MnemeResult<VectorIndexStats> {
        self.check_available()?;
        Ok(VectorIndexStats {
            count: self.vectors.len(),
            dimensions: self.dimensions,
        })
    }
}
