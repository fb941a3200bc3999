//! Hot/warm/cold tiering: documents age out of the vector index as they
//! cool down.
//!
//! Transitions are monotonic (Hot → Warm → Cold) and driven by document
//! timestamp, gated on importance for the Hot exit. Demotion to Cold
//! removes the vector entry; the graph node and metadata row stay.

use chrono::{Duration, Utc};
use tracing::{debug, info};

use mneme_core::document::{DataLayer, Document, DocumentFilters, DocumentStatus, DocumentUpdate};
use mneme_core::errors::MnemeResult;

use crate::repository::MemoryRepository;

/// Outcome of one lifecycle run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleReport {
    pub demoted_to_warm: usize,
    pub demoted_to_cold: usize,
}

impl MemoryRepository {
    /// Run one tiering pass over both batch-limited layer scans.
    ///
    /// Hot documents past retention demote to Warm when important enough
    /// (vector entry kept) and straight to Cold otherwise. Warm documents
    /// past retention demote to Cold. Idempotent: a second run over the
    /// same data changes nothing.
    pub async fn lifecycle_management(&self) -> MnemeResult<LifecycleReport> {
        let now = Utc::now();
        let mut report = LifecycleReport::default();

        let hot = self
            .metadata
            .list(&self.layer_scan(DataLayer::Hot, self.lifecycle.hot_retention_days, now))
            .await?;
        for doc in hot {
            if doc.importance > self.lifecycle.importance_cutoff {
                let patch = DocumentUpdate {
                    layer: Some(DataLayer::Warm),
                    ..Default::default()
                };
                if self.metadata.update(&doc.id, &patch).await? {
                    debug!(doc_id = %doc.id, importance = doc.importance, "demoted hot -> warm");
                    report.demoted_to_warm += 1;
                }
            } else {
                self.demote_to_cold(&doc).await?;
                report.demoted_to_cold += 1;
            }
        }

        let warm = self
            .metadata
            .list(&self.layer_scan(DataLayer::Warm, self.lifecycle.warm_retention_days, now))
            .await?;
        for doc in warm {
            self.demote_to_cold(&doc).await?;
            report.demoted_to_cold += 1;
        }

        info!(
            demoted_to_warm = report.demoted_to_warm,
            demoted_to_cold = report.demoted_to_cold,
            "lifecycle pass complete"
        );
        Ok(report)
    }

    fn layer_scan(
        &self,
        layer: DataLayer,
        retention_days: i64,
        now: chrono::DateTime<Utc>,
    ) -> DocumentFilters {
        DocumentFilters {
            layer: Some(layer),
            status: Some(DocumentStatus::Active),
            before: Some(now - Duration::days(retention_days)),
            limit: self.lifecycle.batch_limit,
            ..Default::default()
        }
    }

    /// Cold means out of the vector index. Removal is idempotent, so a
    /// partially applied earlier pass converges here.
    async fn demote_to_cold(&self, doc: &Document) -> MnemeResult<()> {
        self.vector.remove(&doc.id).await?;
        let patch = DocumentUpdate {
            layer: Some(DataLayer::Cold),
            stored_in_vector: Some(false),
            ..Default::default()
        };
        self.metadata.update(&doc.id, &patch).await?;
        debug!(doc_id = %doc.id, "demoted to cold, vector entry removed");
        Ok(())
    }
}
