//! OpenSearch implementation of the search index provider.
//!
//! Index provisioning, query construction and response decoding for the
//! OpenSearch (and Elasticsearch-compatible) backend.

mod client;
pub mod index_config;
pub mod queries;
mod response;

pub use client::OpenSearchClient;
pub use index_config::IndexConfig;
