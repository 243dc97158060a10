//! # Search Service Repository
//!
//! This crate provides the search index layer of the search service: the
//! provider trait, a typed query DSL, the query builders for each domain,
//! and a concrete implementation for OpenSearch.

pub mod client;
pub mod config;
pub mod dsl;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use client::SearchIndexClient;
pub use config::SearchIndexConfig;
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use opensearch::{IndexConfig, OpenSearchClient};
pub use types::IndexDocument;
