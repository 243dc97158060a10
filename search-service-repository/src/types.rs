//! Request types for search index operations.

use serde_json::Value;

use crate::errors::SearchIndexError;
use search_service_shared::SearchDocument;

/// A document ready to be written: its identifier and its serialized body.
///
/// The identifier is always the entity's primary key rendered as a string,
/// which is what the search engine stores as `_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDocument {
    pub id: String,
    pub body: Value,
}

impl IndexDocument {
    /// Serialize a search document, fixing its identifier to the entity key.
    pub fn from_document<D: SearchDocument>(document: &D) -> Result<Self, SearchIndexError> {
        let body = serde_json::to_value(document).map_err(|e| {
            SearchIndexError::serialization(format!(
                "Failed to serialize document {}: {}",
                document.document_id(),
                e
            ))
        })?;

        Ok(Self {
            id: document.document_id().to_string(),
            body,
        })
    }
}
