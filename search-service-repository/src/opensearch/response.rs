//! Decoding of OpenSearch response bodies.

use std::collections::HashMap;

use serde::Deserialize;

use crate::errors::SearchIndexError;
use search_service_shared::SearchHits;

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    total: Option<TotalHits>,
    #[serde(default)]
    hits: Vec<Hit>,
}

/// `hits.total` is an object since Elasticsearch 7 and a bare number before.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Object { value: u64 },
    Count(u64),
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_id")]
    id: String,
}

impl SearchResponse {
    /// Extract the hit IDs in rank order and the total hit count.
    ///
    /// A missing total falls back to the number of returned hits. An `_id`
    /// that is not an integer fails the whole extraction.
    pub(crate) fn into_hits(self) -> Result<SearchHits, SearchIndexError> {
        let ids = self
            .hits
            .hits
            .iter()
            .map(|hit| {
                hit.id.parse::<i64>().map_err(|e| {
                    SearchIndexError::decode(format!("Invalid document id '{}': {}", hit.id, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total = match self.hits.total {
            Some(TotalHits::Object { value }) | Some(TotalHits::Count(value)) => value,
            None => ids.len() as u64,
        };

        Ok(SearchHits { ids, total })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkResponse {
    #[serde(default)]
    errors: bool,
    #[serde(default)]
    items: Vec<HashMap<String, BulkItem>>,
}

#[derive(Debug, Deserialize)]
struct BulkItem {
    #[serde(rename = "_id", default)]
    id: Option<String>,
    #[serde(default)]
    error: Option<BulkItemError>,
}

#[derive(Debug, Deserialize)]
struct BulkItemError {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    reason: String,
}

impl BulkResponse {
    /// Turn a bulk response carrying item failures into one aggregate error.
    pub(crate) fn into_result(self) -> Result<(), SearchIndexError> {
        if !self.errors {
            return Ok(());
        }

        let total = self.items.len();
        let failures: Vec<(String, &BulkItemError)> = self
            .items
            .iter()
            .flat_map(|item| item.values())
            .filter_map(|item| {
                item.error
                    .as_ref()
                    .map(|error| (item.id.clone().unwrap_or_default(), error))
            })
            .collect();

        let detail = match failures.first() {
            Some((id, error)) => format!(
                ", first failure on '{}': {}: {}",
                id, error.kind, error.reason
            ),
            None => String::new(),
        };

        Err(SearchIndexError::bulk_operation(format!(
            "bulk indexing had errors: {} of {} items failed{}",
            failures.len(),
            total,
            detail
        )))
    }
}
