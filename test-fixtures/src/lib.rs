//! In-memory mock implementations of the Mneme external interfaces,
//! shared by tests across crates.
//!
//! The mocks honor the interface contracts that matter to the engine:
//! idempotent vector removal, merge-add relation weights, shared-entity
//! traversal, filtered metadata listing. Each store can be flipped to an
//! unavailable state to exercise degradation paths.

mod builders;
mod mock_graph;
mod mock_metadata;
mod mock_nlp;
mod mock_vector;

pub use builders::aged_document;
pub use mock_graph::MockGraphStore;
pub use mock_metadata::MockMetadataStore;
pub use mock_nlp::{MockEmbedder, MockEntityExtractor};
pub use mock_vector::MockVectorIndex;
