//! The document model: content plus its footprint across the three stores.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Storage tier of a document. Transitions are monotonic:
/// Hot → Warm → Cold, never reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataLayer {
    Hot,
    Warm,
    Cold,
}

/// Retention class assigned at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionType {
    Permanent,
    Temporary,
    Ephemeral,
}

/// Write-path state of a document.
/// Processing until all side writes commit, then Active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Processing,
    Active,
    Deleted,
}

/// Coarse document category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Conversation,
    Note,
    Event,
    Profile,
    Other,
}

/// A content-bearing document stored across the vector index, the knowledge
/// graph, and the metadata store.
///
/// Invariants:
/// - `stored_in_vector` implies `vector_index_id` resolves back to `id`.
/// - `stored_in_graph` implies `graph_node_id` is present.
/// - `entities` preserves extraction order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// UUID v4 identifier.
    pub id: String,
    pub content: String,
    /// Dense embedding; generated at create time when absent.
    pub embedding: Option<Vec<f32>>,
    /// Extracted entity texts, in extraction order.
    pub entities: Vec<String>,
    pub doc_type: DocumentType,
    pub timestamp: DateTime<Utc>,
    /// Importance in [0, 1]; gates lifecycle demotion.
    pub importance: f64,
    pub layer: DataLayer,
    pub retention: RetentionType,
    pub stored_in_vector: bool,
    pub stored_in_graph: bool,
    /// Internal id assigned by the vector index.
    pub vector_index_id: Option<i64>,
    /// Node id assigned by the graph store.
    pub graph_node_id: Option<String>,
    pub status: DocumentStatus,
    pub metadata: HashMap<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Create a new Hot, Processing document with a fresh UUID.
    pub fn new(content: impl Into<String>, doc_type: DocumentType) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            embedding: None,
            entities: Vec::new(),
            doc_type,
            timestamp: now,
            importance: 0.5,
            layer: DataLayer::Hot,
            retention: RetentionType::Permanent,
            stored_in_vector: false,
            stored_in_graph: false,
            vector_index_id: None,
            graph_node_id: None,
            status: DocumentStatus::Processing,
            metadata: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_importance(mut self, importance: f64) -> Self {
        self.importance = importance.clamp(0.0, 1.0);
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub fn with_retention(mut self, retention: RetentionType) -> Self {
        self.retention = retention;
        self
    }
}

/// Identity equality: two documents are equal if they have the same ID.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Explicit optional-field patch for document updates.
/// `None` fields are left untouched; metadata update is last-writer-wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentUpdate {
    pub content: Option<String>,
    pub embedding: Option<Vec<f32>>,
    pub entities: Option<Vec<String>>,
    pub doc_type: Option<DocumentType>,
    pub importance: Option<f64>,
    pub layer: Option<DataLayer>,
    pub retention: Option<RetentionType>,
    pub status: Option<DocumentStatus>,
    pub stored_in_vector: Option<bool>,
    pub vector_index_id: Option<i64>,
    pub metadata: Option<HashMap<String, Value>>,
}

impl DocumentUpdate {
    /// Apply this patch to a document, refreshing `updated_at`.
    pub fn apply(&self, doc: &mut Document) {
        if let Some(content) = &self.content {
            doc.content = content.clone();
        }
        if let Some(embedding) = &self.embedding {
            doc.embedding = Some(embedding.clone());
        }
        if let Some(entities) = &self.entities {
            doc.entities = entities.clone();
        }
        if let Some(doc_type) = self.doc_type {
            doc.doc_type = doc_type;
        }
        if let Some(importance) = self.importance {
            doc.importance = importance.clamp(0.0, 1.0);
        }
        if let Some(layer) = self.layer {
            doc.layer = layer;
        }
        if let Some(retention) = self.retention {
            doc.retention = retention;
        }
        if let Some(status) = self.status {
            doc.status = status;
        }
        if let Some(stored) = self.stored_in_vector {
            doc.stored_in_vector = stored;
        }
        if let Some(vector_id) = self.vector_index_id {
            doc.vector_index_id = Some(vector_id);
        }
        if let Some(metadata) = &self.metadata {
            doc.metadata = metadata.clone();
        }
        doc.updated_at = Utc::now();
    }
}

/// Filter set for metadata listing and post-fusion filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentFilters {
    pub doc_type: Option<DocumentType>,
    pub status: Option<DocumentStatus>,
    pub layer: Option<DataLayer>,
    pub retention: Option<RetentionType>,
    /// Only documents with `timestamp` strictly before this instant.
    pub before: Option<DateTime<Utc>>,
    /// Only documents with `timestamp` strictly after this instant.
    pub after: Option<DateTime<Utc>>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for DocumentFilters {
    fn default() -> Self {
        Self {
            doc_type: None,
            status: None,
            layer: None,
            retention: None,
            before: None,
            after: None,
            limit: 100,
            offset: 0,
        }
    }
}

impl DocumentFilters {
    /// Whether a document satisfies every set predicate (limit/offset
    /// are pagination, not predicates).
    pub fn matches(&self, doc: &Document) -> bool {
        if let Some(doc_type) = self.doc_type {
            if doc.doc_type != doc_type {
                return false;
            }
        }
        if let Some(status) = self.status {
            if doc.status != status {
                return false;
            }
        }
        if let Some(layer) = self.layer {
            if doc.layer != layer {
                return false;
            }
        }
        if let Some(retention) = self.retention {
            if doc.retention != retention {
                return false;
            }
        }
        if let Some(before) = self.before {
            if doc.timestamp >= before {
                return false;
            }
        }
        if let Some(after) = self.after {
            if doc.timestamp <= after {
                return false;
            }
        }
        true
    }
}
