//! # mneme-core
//!
//! Foundation crate for the Mneme memory engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod document;
pub mod entity;
pub mod errors;
pub mod result;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::MnemeConfig;
pub use document::{
    DataLayer, Document, DocumentFilters, DocumentStatus, DocumentType, DocumentUpdate,
    RetentionType,
};
pub use entity::{Entity, EntityType};
pub use errors::{MnemeError, MnemeResult};
pub use result::{ResultSource, RetrievalResult};
