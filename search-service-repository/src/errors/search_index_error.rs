//! Search index error types.
//!
//! This module defines the error types that can occur during search index operations.

use thiserror::Error;

/// Errors that can occur during search index operations.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Failed to reach the search engine or build the transport.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to check for or create an index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// Failed to index a single document.
    #[error("Index error: {0}")]
    IndexError(String),

    /// At least one sub-operation of a bulk request failed.
    #[error("Bulk operation error: {0}")]
    BulkOperationError(String),

    /// A document or request body could not be serialized.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Search query execution failed.
    #[error("Query error: {0}")]
    QueryError(String),

    /// The engine response could not be decoded, or carried an identifier
    /// that is not an integer primary key.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Batch size exceeds configured maximum.
    #[error("Batch size {provided} exceeds maximum {max}")]
    BatchSizeExceeded { provided: usize, max: usize },
}

impl SearchIndexError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::IndexError(msg.into())
    }

    /// Create a bulk operation error.
    pub fn bulk_operation(msg: impl Into<String>) -> Self {
        Self::BulkOperationError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::DecodeError(msg.into())
    }

    /// Create a batch size exceeded error.
    pub fn batch_size_exceeded(provided: usize, max: usize) -> Self {
        Self::BatchSizeExceeded { provided, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SearchIndexError::bulk_operation("2 of 3 items failed").to_string(),
            "Bulk operation error: 2 of 3 items failed"
        );
        assert_eq!(
            SearchIndexError::batch_size_exceeded(5, 2).to_string(),
            "Batch size 5 exceeds maximum 2"
        );
    }
}
