//! Tracity Query: turns loose requests into collection-aware queries.
//!
//! Free text goes through [`intent::extract`]; structured requests arrive as
//! [`FilterRequest`]. Both end up in [`compiler::compile`].

pub mod catalog;
pub mod collections;
pub mod compiler;
pub mod intent;
pub mod regions;
pub mod request;

pub use catalog::{CollectionMetadata, MetadataCatalog};
pub use collections::{CollectionProfile, YearEncoding};
pub use compiler::{compile, compile_intent, compile_request, FilterSpec};
pub use intent::{extract, QueryIntent};
pub use request::FilterRequest;
