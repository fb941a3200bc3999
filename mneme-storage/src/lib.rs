//! # mneme-storage
//!
//! The dual-write memory repository: every document lives in up to three
//! stores at once (vector index for similarity, knowledge graph for entity
//! relations, metadata store as the durable commit point), plus the
//! hot/warm/cold lifecycle tiering that ages documents out of the
//! expensive stores.

pub mod lifecycle;
pub mod repository;

pub use lifecycle::LifecycleReport;
pub use repository::{MemoryRepository, RepositoryStats};
