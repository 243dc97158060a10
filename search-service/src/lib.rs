//! # Search Service
//!
//! Main library for the node, hardware and address search service.
//!
//! This crate wires the search index and the indexing pipeline together and
//! exposes the index/search facade used by request handlers.

pub mod config;
pub mod service;
pub mod telemetry;

pub use config::{Dependencies, LogFormat, ServiceConfig};
pub use service::{SearchService, ServiceError};

use thiserror::Error;

/// Errors that can occur during service initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] search_service_pipeline::PipelineError),

    /// Search index error.
    #[error("Search index error: {0}")]
    SearchIndexError(#[from] search_service_repository::SearchIndexError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
