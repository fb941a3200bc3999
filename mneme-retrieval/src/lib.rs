//! # mneme-retrieval
//!
//! Retrieval strategies over the Mneme stores: the entity-graph retriever
//! with bounded multi-hop expansion, the staged retrieval pipeline and its
//! presets, and score fusion (RRF and multi-dimensional weighted).

pub mod fusion;
pub mod graph_retriever;
pub mod hybrid_retriever;
pub mod pipeline;
pub mod stages;
pub mod tokenize;

pub use graph_retriever::{GraphRetriever, GraphRetrieverOptions};
pub use hybrid_retriever::HybridRetriever;
pub use pipeline::{IntentBias, PipelineContext, PipelineDeps, RetrievalPipeline};
pub use tokenize::SimpleTokenizer;
