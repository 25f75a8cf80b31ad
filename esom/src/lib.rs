//! esom — metadata-driven Elasticsearch object mapping.
//!
//! Field descriptors declared with `#[derive(EsDocument)]` drive three
//! metadata-dependent paths: compiling an index mapping
//! ([`mapping::compile`]), extracting per-document identifiers for bulk
//! writes ([`identifier::resolve`] plus the generated id accessor), and
//! back-patching highlight fragments into search results
//! ([`highlight::apply_highlights`]). Everything else is the thin [`Es`]
//! facade forwarding to the official protocol client.

extern crate self as esom;

pub mod client;
pub mod config;
pub mod errors;
pub mod highlight;
pub mod identifier;
pub mod mapping;
pub mod registry;
pub mod response;
pub mod types;

pub use client::{bulk_operations, Es, SearchInput};
pub use config::{EsConfig, IndexConfig};
pub use errors::{EsError, EsResult};
pub use highlight::apply_highlights;
pub use identifier::{resolve, resolve_for};
pub use mapping::{
    compile, compile_descriptor, compile_with, parse_relations, MappingPrecedence, Property,
    TypeMapping,
};
pub use registry::{descriptor_by_name, registered_documents, DocumentRegistration};
pub use response::{Hit, HitsMetadata, SearchResponse, TotalHits};
pub use types::{DocumentDescriptor, DocumentMetadata, EsDocument, FieldDescriptor};

pub use esom_macros::EsDocument;

// Re-exported so derive-generated code and downstream crates resolve these
// without a direct dependency.
pub use inventory;
pub use serde_json;
