//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::request::JsonBody,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    params::Refresh,
    BulkParts, IndexParts, OpenSearch, SearchParts,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::dsl::SearchRequest;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_config::{get_index_settings, IndexConfig};
use crate::opensearch::response::{BulkResponse, SearchResponse};
use crate::types::IndexDocument;
use search_service_shared::{IndexKind, SearchHits};

/// OpenSearch client implementation.
///
/// Works unchanged against Elasticsearch 7+, which speaks the same REST
/// dialect for every call made here.
///
/// # Example
///
/// ```ignore
/// use search_service_repository::opensearch::{IndexConfig, OpenSearchClient};
///
/// let client = OpenSearchClient::new("http://localhost:9200", IndexConfig::default()).await?;
/// client.ensure_index(IndexKind::Nodes).await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
    index_config: IndexConfig,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client connected to the specified URL.
    ///
    /// No request is made here; use [`SearchIndexProvider::health_check`] to
    /// verify the connection.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `index_config` - Index naming and write behaviour
    pub async fn new(url: &str, index_config: IndexConfig) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            prefix = %index_config.prefix,
            refresh = index_config.refresh,
            "Created OpenSearch client"
        );

        Ok(Self {
            client,
            index_config,
        })
    }

    fn refresh(&self) -> Refresh {
        if self.index_config.refresh {
            Refresh::True
        } else {
            Refresh::False
        }
    }

    /// Read the body of a non-2xx response for error reporting.
    async fn failure_body(response: Response) -> String {
        response.text().await.unwrap_or_default()
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchClient {
    #[instrument(skip(self), fields(index = %self.index_config.index_name(kind)))]
    async fn ensure_index(&self, kind: IndexKind) -> Result<(), SearchIndexError> {
        let index = self.index_config.index_name(kind);

        let exists = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[&index]))
            .send()
            .await
            .map_err(|e| {
                SearchIndexError::index_creation(format!(
                    "Failed to check index {}: {}",
                    index, e
                ))
            })?;

        if exists.status_code().is_success() {
            debug!("Index already exists");
            return Ok(());
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&index))
            .body(get_index_settings(kind))
            .send()
            .await
            .map_err(|e| {
                SearchIndexError::index_creation(format!(
                    "Failed to create index {}: {}",
                    index, e
                ))
            })?;

        let status = response.status_code();
        if !status.is_success() {
            let body = Self::failure_body(response).await;
            // Lost a creation race with another writer.
            if body.contains("resource_already_exists_exception") {
                debug!("Index created concurrently");
                return Ok(());
            }
            error!(status = %status, body = %body, "Create index request failed");
            return Err(SearchIndexError::index_creation(format!(
                "Failed to create index {} (status {}): {}",
                index, status, body
            )));
        }

        info!("Created index");
        Ok(())
    }

    async fn index_document(
        &self,
        kind: IndexKind,
        document: IndexDocument,
    ) -> Result<(), SearchIndexError> {
        let index = self.index_config.index_name(kind);

        let response = self
            .client
            .index(IndexParts::IndexId(&index, &document.id))
            .refresh(self.refresh())
            .body(document.body)
            .send()
            .await
            .map_err(|e| SearchIndexError::index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = Self::failure_body(response).await;
            error!(status = %status, body = %error_body, index = %index, "Index request failed");
            return Err(SearchIndexError::index(format!(
                "Index failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(index = %index, doc_id = %document.id, "Document indexed");
        Ok(())
    }

    async fn bulk_index_documents(
        &self,
        kind: IndexKind,
        documents: Vec<IndexDocument>,
    ) -> Result<(), SearchIndexError> {
        if documents.is_empty() {
            return Ok(());
        }

        let index = self.index_config.index_name(kind);
        let count = documents.len();

        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(count * 2);
        for document in documents {
            body.push(json!({ "index": { "_id": document.id } }).into());
            body.push(document.body.into());
        }

        let response = self
            .client
            .bulk(BulkParts::Index(&index))
            .refresh(self.refresh())
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::bulk_operation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = Self::failure_body(response).await;
            error!(status = %status, body = %error_body, index = %index, "Bulk request failed");
            return Err(SearchIndexError::bulk_operation(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        let bulk: BulkResponse = response.json().await.map_err(|e| {
            SearchIndexError::decode(format!("Failed to decode bulk response: {}", e))
        })?;

        if let Err(e) = bulk.into_result() {
            warn!(index = %index, count, error = %e, "Bulk request had item failures");
            return Err(e);
        }

        debug!(index = %index, count, "Documents bulk indexed");
        Ok(())
    }

    async fn search(
        &self,
        kind: IndexKind,
        request: &SearchRequest,
    ) -> Result<SearchHits, SearchIndexError> {
        let index = self.index_config.index_name(kind);

        let response = self
            .client
            .search(SearchParts::Index(&[&index]))
            .body(request)
            .send()
            .await
            .map_err(|e| SearchIndexError::query(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = Self::failure_body(response).await;
            error!(status = %status, body = %error_body, index = %index, "Search request failed");
            return Err(SearchIndexError::query(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let body: SearchResponse = response.json().await.map_err(|e| {
            SearchIndexError::decode(format!("Failed to decode search response: {}", e))
        })?;

        let hits = body.into_hits()?;
        debug!(index = %index, returned = hits.ids.len(), total = hits.total, "Search completed");
        Ok(hits)
    }

    async fn health_check(&self) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(format!("Health check failed: {}", e)))?;

        let health: Value = response.json().await.map_err(|e| {
            SearchIndexError::decode(format!("Failed to decode cluster health: {}", e))
        })?;
        let status = health
            .get("status")
            .and_then(|s| s.as_str())
            .unwrap_or("unknown");

        info!(status = %status, "OpenSearch cluster status");

        match status {
            "green" | "yellow" => Ok(()),
            other => Err(SearchIndexError::connection(format!(
                "Cluster status is {}",
                other
            ))),
        }
    }
}
