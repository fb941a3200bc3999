//! External interface contracts consumed by the engine.
//!
//! The vector index, graph store, and metadata store are leaf collaborators:
//! only their interfaces live here, never their implementations.

mod embedder;
mod extractor;
mod graph_store;
mod metadata_store;
mod tokenizer;
mod vector_index;

pub use embedder::Embedder;
pub use extractor::EntityExtractor;
pub use graph_store::{EntityMatch, GraphStore, RelatedDoc};
pub use metadata_store::MetadataStore;
pub use tokenizer::Tokenizer;
pub use vector_index::{VectorIndex, VectorIndexStats, VectorMatch};
