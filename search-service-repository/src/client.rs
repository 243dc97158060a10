//! Search index client implementation.
//!
//! This module provides the main client for interacting with the search index.
//! Application code uses this to index entities and run searches without
//! knowing which backend stores them.

use std::sync::Arc;

use tracing::debug;

use crate::config::SearchIndexConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::queries::{build_address_search, build_hardware_search, build_node_search};
use crate::types::IndexDocument;
use search_service_shared::{
    Address, AddressDocument, AddressQuery, Hardware, HardwareDocument, HardwareFilter,
    IndexKind, Node, NodeDocument, NodeFilter, SearchDocument, SearchHits, SearchQuery,
};

/// The main client for interacting with the search index.
///
/// Cheap to clone; every clone shares the same provider.
#[derive(Clone)]
pub struct SearchIndexClient {
    provider: Arc<dyn SearchIndexProvider>,
    config: SearchIndexConfig,
}

impl SearchIndexClient {
    /// Create a new SearchIndexClient with default configuration.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: SearchIndexConfig::default(),
        }
    }

    /// Create a new SearchIndexClient with custom configuration.
    pub fn with_config(provider: Arc<dyn SearchIndexProvider>, config: SearchIndexConfig) -> Self {
        Self { provider, config }
    }

    /// Check if batch size exceeds the configured limit.
    fn validate_batch_size(&self, size: usize) -> Result<(), SearchIndexError> {
        if let Some(max) = self.config.max_batch_size {
            if size > max {
                return Err(SearchIndexError::batch_size_exceeded(size, max));
            }
        }
        Ok(())
    }

    /// Make sure the index for `kind` exists. Safe to call repeatedly.
    pub async fn ensure_index(&self, kind: IndexKind) -> Result<(), SearchIndexError> {
        self.provider.ensure_index(kind).await
    }

    /// Make sure all three indices exist.
    pub async fn ensure_all_indices(&self) -> Result<(), SearchIndexError> {
        for kind in IndexKind::ALL {
            self.provider.ensure_index(kind).await?;
        }
        Ok(())
    }

    /// Check that the backend is reachable and healthy.
    pub async fn health_check(&self) -> Result<(), SearchIndexError> {
        self.provider.health_check().await
    }

    async fn write_one<D: SearchDocument>(&self, document: D) -> Result<(), SearchIndexError> {
        let indexed = IndexDocument::from_document(&document)?;
        self.provider.index_document(D::KIND, indexed).await
    }

    async fn write_many<D: SearchDocument>(&self, documents: Vec<D>) -> Result<(), SearchIndexError> {
        if documents.is_empty() {
            return Ok(());
        }

        self.validate_batch_size(documents.len())?;

        let indexed = documents
            .iter()
            .map(IndexDocument::from_document)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(kind = %D::KIND, count = indexed.len(), "Bulk indexing documents");
        self.provider.bulk_index_documents(D::KIND, indexed).await
    }

    /// Index a single node, replacing any previous version.
    pub async fn index_node(&self, node: Node) -> Result<(), SearchIndexError> {
        self.write_one(NodeDocument::from(node)).await
    }

    /// Index many nodes in one bulk request. An empty batch is a no-op.
    pub async fn index_nodes(&self, nodes: Vec<Node>) -> Result<(), SearchIndexError> {
        self.write_many(nodes.into_iter().map(NodeDocument::from).collect())
            .await
    }

    /// Index a single hardware item, replacing any previous version.
    pub async fn index_hardware(&self, hardware: Hardware) -> Result<(), SearchIndexError> {
        self.write_one(HardwareDocument::from(hardware)).await
    }

    /// Index many hardware items in one bulk request. An empty batch is a no-op.
    pub async fn index_hardware_batch(
        &self,
        hardware: Vec<Hardware>,
    ) -> Result<(), SearchIndexError> {
        self.write_many(hardware.into_iter().map(HardwareDocument::from).collect())
            .await
    }

    /// Index a single address, replacing any previous version.
    pub async fn index_address(&self, address: Address) -> Result<(), SearchIndexError> {
        self.write_one(AddressDocument::from(address)).await
    }

    /// Index many addresses in one bulk request. An empty batch is a no-op.
    pub async fn index_addresses(&self, addresses: Vec<Address>) -> Result<(), SearchIndexError> {
        self.write_many(addresses.into_iter().map(AddressDocument::from).collect())
            .await
    }

    /// Search nodes. Returns matching node IDs in rank order.
    pub async fn search_nodes(
        &self,
        query: &SearchQuery,
        filter: &NodeFilter,
    ) -> Result<SearchHits, SearchIndexError> {
        let request = build_node_search(query, filter);
        self.provider.search(IndexKind::Nodes, &request).await
    }

    /// Search hardware. Returns matching hardware IDs in rank order.
    pub async fn search_hardware(
        &self,
        query: &SearchQuery,
        filter: &HardwareFilter,
    ) -> Result<SearchHits, SearchIndexError> {
        let request = build_hardware_search(query, filter);
        self.provider.search(IndexKind::Hardware, &request).await
    }

    /// Search addresses. Returns matching house IDs in rank order.
    pub async fn search_addresses(
        &self,
        query: &AddressQuery,
    ) -> Result<SearchHits, SearchIndexError> {
        let request = build_address_search(query);
        self.provider.search(IndexKind::Addresses, &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::SearchRequest;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    /// In-memory provider keyed by index kind and document ID.
    #[derive(Default)]
    struct MockProvider {
        documents: Mutex<HashMap<(IndexKind, String), Value>>,
        ensured: Mutex<Vec<IndexKind>>,
        bulk_calls: Mutex<usize>,
        searches: Mutex<Vec<(IndexKind, SearchRequest)>>,
        /// Document IDs whose bulk item is rejected.
        reject_ids: Vec<String>,
        hits: SearchHits,
    }

    #[async_trait]
    impl SearchIndexProvider for MockProvider {
        async fn ensure_index(&self, kind: IndexKind) -> Result<(), SearchIndexError> {
            self.ensured.lock().await.push(kind);
            Ok(())
        }

        async fn index_document(
            &self,
            kind: IndexKind,
            document: IndexDocument,
        ) -> Result<(), SearchIndexError> {
            self.documents
                .lock()
                .await
                .insert((kind, document.id), document.body);
            Ok(())
        }

        async fn bulk_index_documents(
            &self,
            kind: IndexKind,
            documents: Vec<IndexDocument>,
        ) -> Result<(), SearchIndexError> {
            *self.bulk_calls.lock().await += 1;
            let total = documents.len();
            let mut failed = 0;
            let mut stored = self.documents.lock().await;
            for document in documents {
                if self.reject_ids.contains(&document.id) {
                    failed += 1;
                    continue;
                }
                stored.insert((kind, document.id), document.body);
            }
            if failed > 0 {
                return Err(SearchIndexError::bulk_operation(format!(
                    "bulk indexing had errors: {} of {} items failed",
                    failed, total
                )));
            }
            Ok(())
        }

        async fn search(
            &self,
            kind: IndexKind,
            request: &SearchRequest,
        ) -> Result<SearchHits, SearchIndexError> {
            self.searches.lock().await.push((kind, request.clone()));
            Ok(self.hits.clone())
        }

        async fn health_check(&self) -> Result<(), SearchIndexError> {
            Ok(())
        }
    }

    fn node(id: i64, name: &str) -> Node {
        Node {
            id,
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_index_node_is_upsert() {
        let provider = Arc::new(MockProvider::default());
        let client = SearchIndexClient::new(provider.clone());

        client.index_node(node(7, "edge-1")).await.unwrap();
        client.index_node(node(7, "edge-1-renamed")).await.unwrap();

        let documents = provider.documents.lock().await;
        assert_eq!(documents.len(), 1);
        assert_eq!(
            documents[&(IndexKind::Nodes, "7".to_string())]["name"],
            "edge-1-renamed"
        );
    }

    #[tokio::test]
    async fn test_bulk_is_idempotent() {
        let provider = Arc::new(MockProvider::default());
        let client = SearchIndexClient::new(provider.clone());

        let batch = vec![node(1, "a"), node(2, "b"), node(3, "c")];
        client.index_nodes(batch.clone()).await.unwrap();
        client.index_nodes(batch).await.unwrap();

        assert_eq!(provider.documents.lock().await.len(), 3);
        assert_eq!(*provider.bulk_calls.lock().await, 2);
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_request() {
        let provider = Arc::new(MockProvider::default());
        let client = SearchIndexClient::new(provider.clone());

        client.index_nodes(Vec::new()).await.unwrap();
        client.index_addresses(Vec::new()).await.unwrap();

        assert_eq!(*provider.bulk_calls.lock().await, 0);
    }

    #[tokio::test]
    async fn test_partial_bulk_failure_is_reported() {
        let provider = Arc::new(MockProvider {
            reject_ids: vec!["2".to_string()],
            ..Default::default()
        });
        let client = SearchIndexClient::new(provider.clone());

        let result = client
            .index_nodes(vec![node(1, "a"), node(2, "b"), node(3, "c")])
            .await;

        assert!(matches!(result, Err(SearchIndexError::BulkOperationError(_))));
        // The other items still landed.
        assert_eq!(provider.documents.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_batch_size_limit() {
        let provider = Arc::new(MockProvider::default());
        let client = SearchIndexClient::with_config(
            provider.clone(),
            SearchIndexConfig::with_max_batch_size(2),
        );

        let result = client
            .index_nodes(vec![node(1, "a"), node(2, "b"), node(3, "c")])
            .await;

        assert!(matches!(
            result,
            Err(SearchIndexError::BatchSizeExceeded { provided: 3, max: 2 })
        ));
        assert_eq!(*provider.bulk_calls.lock().await, 0);
    }

    #[tokio::test]
    async fn test_hardware_and_address_land_in_their_indices() {
        let provider = Arc::new(MockProvider::default());
        let client = SearchIndexClient::new(provider.clone());

        client
            .index_hardware(Hardware {
                id: 9,
                ip_address: Some("10.0.0.9".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        client
            .index_addresses(vec![Address {
                house_id: 221,
                street_name: "Baker".to_string(),
                house_name: Some("221B".to_string()),
                ..Default::default()
            }])
            .await
            .unwrap();

        let documents = provider.documents.lock().await;
        let hardware = &documents[&(IndexKind::Hardware, "9".to_string())];
        assert_eq!(hardware["is_delete"], false);
        let address = &documents[&(IndexKind::Addresses, "221".to_string())];
        assert_eq!(address["street_name"], "Baker");
    }

    #[tokio::test]
    async fn test_ensure_all_indices() {
        let provider = Arc::new(MockProvider::default());
        let client = SearchIndexClient::new(provider.clone());

        client.ensure_all_indices().await.unwrap();

        assert_eq!(*provider.ensured.lock().await, IndexKind::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_searches_target_their_index() {
        let provider = Arc::new(MockProvider {
            hits: SearchHits {
                ids: vec![3, 1],
                total: 2,
            },
            ..Default::default()
        });
        let client = SearchIndexClient::new(provider.clone());

        let hits = client
            .search_nodes(&SearchQuery::new("core", 0, 10), &NodeFilter::default())
            .await
            .unwrap();
        assert_eq!(hits.ids, vec![3, 1]);

        client
            .search_hardware(&SearchQuery::new("sw", 0, 10), &HardwareFilter::default())
            .await
            .unwrap();
        client
            .search_addresses(&AddressQuery::street("Baker", 0, 10).with_house("12"))
            .await
            .unwrap();

        let searches = provider.searches.lock().await;
        let kinds: Vec<IndexKind> = searches.iter().map(|(kind, _)| *kind).collect();
        assert_eq!(
            kinds,
            vec![IndexKind::Nodes, IndexKind::Hardware, IndexKind::Addresses]
        );
        assert_eq!(searches[2].1.track_total_hits, Some(true));
    }
}
