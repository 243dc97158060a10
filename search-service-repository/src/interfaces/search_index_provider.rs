//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;

use crate::dsl::SearchRequest;
use crate::errors::SearchIndexError;
use crate::types::IndexDocument;
use search_service_shared::{IndexKind, SearchHits};

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are injected into `SearchIndexClient` to enable dependency
/// injection and easy testing with mock implementations. Every operation is
/// addressed by [`IndexKind`]; mapping a kind to a concrete index name is the
/// provider's job.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Make sure the index for `kind` exists with its analysis settings and
    /// mappings.
    ///
    /// Calling this when the index already exists is not an error, including
    /// when another writer created it concurrently.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index exists afterwards
    /// * `Err(SearchIndexError::IndexCreationError)` - If the check or creation fails
    async fn ensure_index(&self, kind: IndexKind) -> Result<(), SearchIndexError>;

    /// Index a single document, replacing any document with the same ID.
    ///
    /// # Arguments
    ///
    /// * `kind` - Index to write into
    /// * `document` - The serialized document and its ID
    async fn index_document(
        &self,
        kind: IndexKind,
        document: IndexDocument,
    ) -> Result<(), SearchIndexError>;

    /// Index multiple documents in a single request.
    ///
    /// Each document is an upsert keyed by its ID. If any item of the request
    /// fails the whole call fails, even though the engine may have applied
    /// the other items.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If every item was accepted, or `documents` is empty
    /// * `Err(SearchIndexError::BulkOperationError)` - If at least one item failed
    async fn bulk_index_documents(
        &self,
        kind: IndexKind,
        documents: Vec<IndexDocument>,
    ) -> Result<(), SearchIndexError>;

    /// Run a search and return the matching IDs in rank order with the total
    /// hit count.
    async fn search(
        &self,
        kind: IndexKind,
        request: &SearchRequest,
    ) -> Result<SearchHits, SearchIndexError>;

    /// Check that the engine is reachable and the cluster is usable.
    async fn health_check(&self) -> Result<(), SearchIndexError>;
}
