use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use mneme_core::document::{Document, DocumentFilters, DocumentUpdate};
use mneme_core::errors::{MnemeResult, StorageError};
use mneme_core::traits::MetadataStore;

/// In-memory metadata store with filtered listing.
pub struct MockMetadataStore {
    docs: DashMap<String, Document>,
    unavailable: AtomicBool,
}

impl MockMetadataStore {
    pub fn new() -> Self {
        Self {
            docs: DashMap::new(),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    fn check_available(&self) -> MnemeResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Metadata {
                reason: "mock metadata store offline".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl Default for MockMetadataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataStore for MockMetadataStore {
    async fn insert(&self, doc: &Document) -> MnemeResult<()> {
        self.check_available()?;
        self.docs.insert(doc.id.clone(), doc.clone());
        Ok(())
    }

    async fn get(&self, doc_id: &str) -> MnemeResult<Option<Document>> {
        self.check_available()?;
        Ok(self.docs.get(doc_id).map(|d| d.clone()))
    }

    async fn get_by_ids(&self, doc_ids: &[String]) -> MnemeResult<Vec<Document>> {
        self.check_available()?;
        Ok(doc_ids
            .iter()
            .filter_map(|id| self.docs.get(id).map(|d| d.clone()))
            .collect())
    }

    async fn update(&self, doc_id: &str, update: &DocumentUpdate) -> MnemeResult<bool> {
        self.check_available()?;
        match self.docs.get_mut(doc_id) {
            Some(mut doc) => {
                update.apply(&mut doc);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, doc_id: &str) -> MnemeResult<bool> {
        self.check_available()?;
        Ok(self.docs.remove(doc_id).is_some())
    }

    async fn list(&self, filters: &DocumentFilters) -> MnemeResult<Vec<Document>> {
        self.check_available()?;
        let mut docs: Vec<Document> = self
            .docs
            .iter()
            .filter(|entry| filters.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        docs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(docs
            .into_iter()
            .skip(filters.offset)
            .take(filters.limit)
            .collect())
    }

    async fn count(&self, filters: &DocumentFilters) -> MnemeResult<usize> {
        self.check_available()?;
        Ok(self
            .docs
            .iter()
            .filter(|entry| filters.matches(entry.value()))
            .count())
    }
}
