//! Index and search facade.
//!
//! Maps each request-level operation onto the search index client. Internal
//! errors are logged in full and replaced by a fixed message naming the
//! failed operation, so callers never see engine details.

use std::future::Future;

use thiserror::Error;
use tracing::{error, info};

use search_service_repository::{SearchIndexClient, SearchIndexError};
use search_service_shared::{
    Address, AddressQuery, Hardware, HardwareFilter, IndexKind, Node, NodeFilter, SearchHits,
    SearchQuery,
};

/// Error returned to callers of the facade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The operation failed; the message names only the operation.
    #[error("{0}")]
    Internal(&'static str),
}

impl ServiceError {
    /// Status code reported in request logs.
    pub fn status(&self) -> &'static str {
        match self {
            ServiceError::Internal(_) => "Internal",
        }
    }
}

const ENSURE_INDEX_FAILED: &str = "failed to ensure index";

/// An internal result tagged with the message to expose on failure.
type Attempt<T> = Result<T, (SearchIndexError, &'static str)>;

fn tag<T>(result: Result<T, SearchIndexError>, failure: &'static str) -> Attempt<T> {
    result.map_err(|e| (e, failure))
}

/// Log the outcome of `method` and hide internal detail from the caller.
fn finish<T>(method: &'static str, attempt: Attempt<T>) -> Result<T, ServiceError> {
    let result = attempt.map_err(|(e, failure)| {
        error!(method, error = %e, "{}", failure);
        ServiceError::Internal(failure)
    });

    let status = match &result {
        Ok(_) => "OK",
        Err(e) => e.status(),
    };
    info!(method, status, "Request completed");

    result
}

/// The index/search facade shared by request handlers.
#[derive(Clone)]
pub struct SearchService {
    client: SearchIndexClient,
}

impl SearchService {
    pub fn new(client: SearchIndexClient) -> Self {
        Self { client }
    }

    /// Provision the index of `kind`, then run `write`. The write does not
    /// start if provisioning fails.
    async fn ensure_then_write<F>(
        &self,
        kind: IndexKind,
        write: F,
        failure: &'static str,
    ) -> Attempt<()>
    where
        F: Future<Output = Result<(), SearchIndexError>>,
    {
        tag(self.client.ensure_index(kind).await, ENSURE_INDEX_FAILED)?;
        tag(write.await, failure)
    }

    pub async fn index_node(&self, node: Node) -> Result<(), ServiceError> {
        let attempt = tag(self.client.index_node(node).await, "failed to index node");
        finish("IndexNode", attempt)
    }

    /// Ensure the node index, then bulk-write the nodes.
    pub async fn index_nodes(&self, nodes: Vec<Node>) -> Result<(), ServiceError> {
        let attempt = self
            .ensure_then_write(
                IndexKind::Nodes,
                self.client.index_nodes(nodes),
                "failed to index nodes",
            )
            .await;
        finish("IndexNodes", attempt)
    }

    pub async fn search_nodes(
        &self,
        query: &SearchQuery,
        filter: &NodeFilter,
    ) -> Result<SearchHits, ServiceError> {
        let attempt = tag(
            self.client.search_nodes(query, filter).await,
            "failed to search nodes",
        );
        finish("SearchNodes", attempt)
    }

    pub async fn index_hardware(&self, hardware: Hardware) -> Result<(), ServiceError> {
        let attempt = tag(
            self.client.index_hardware(hardware).await,
            "failed to index hardware",
        );
        finish("IndexHardware", attempt)
    }

    /// Ensure the hardware index, then bulk-write the items.
    pub async fn index_hardware_batch(&self, hardware: Vec<Hardware>) -> Result<(), ServiceError> {
        let attempt = self
            .ensure_then_write(
                IndexKind::Hardware,
                self.client.index_hardware_batch(hardware),
                "failed to index hardware batch",
            )
            .await;
        finish("IndexHardwareBatch", attempt)
    }

    pub async fn search_hardware(
        &self,
        query: &SearchQuery,
        filter: &HardwareFilter,
    ) -> Result<SearchHits, ServiceError> {
        let attempt = tag(
            self.client.search_hardware(query, filter).await,
            "failed to search hardware",
        );
        finish("SearchHardware", attempt)
    }

    pub async fn index_address(&self, address: Address) -> Result<(), ServiceError> {
        let attempt = tag(
            self.client.index_address(address).await,
            "failed to index address",
        );
        finish("IndexAddress", attempt)
    }

    /// Ensure the address index, then bulk-write the addresses.
    pub async fn index_addresses(&self, addresses: Vec<Address>) -> Result<(), ServiceError> {
        let attempt = self
            .ensure_then_write(
                IndexKind::Addresses,
                self.client.index_addresses(addresses),
                "failed to index addresses",
            )
            .await;
        finish("IndexAddresses", attempt)
    }

    pub async fn search_addresses(&self, query: &AddressQuery) -> Result<SearchHits, ServiceError> {
        let attempt = tag(
            self.client.search_addresses(query).await,
            "failed to search addresses",
        );
        finish("SearchAddresses", attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use search_service_repository::dsl::SearchRequest;
    use search_service_repository::{IndexDocument, SearchIndexProvider};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct MockProvider {
        calls: Mutex<Vec<String>>,
        fail_ensure: bool,
        fail_all: bool,
        hits: SearchHits,
    }

    impl MockProvider {
        async fn record(&self, call: String) -> Result<(), SearchIndexError> {
            self.calls.lock().await.push(call);
            if self.fail_all {
                return Err(SearchIndexError::query("connection refused to 10.1.2.3:9200"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl SearchIndexProvider for MockProvider {
        async fn ensure_index(&self, kind: IndexKind) -> Result<(), SearchIndexError> {
            self.record(format!("ensure {}", kind)).await?;
            if self.fail_ensure {
                return Err(SearchIndexError::index_creation("disk watermark exceeded"));
            }
            Ok(())
        }

        async fn index_document(
            &self,
            kind: IndexKind,
            document: IndexDocument,
        ) -> Result<(), SearchIndexError> {
            self.record(format!("index {} {}", kind, document.id)).await
        }

        async fn bulk_index_documents(
            &self,
            kind: IndexKind,
            documents: Vec<IndexDocument>,
        ) -> Result<(), SearchIndexError> {
            self.record(format!("bulk {} {}", kind, documents.len()))
                .await
        }

        async fn search(
            &self,
            kind: IndexKind,
            _request: &SearchRequest,
        ) -> Result<SearchHits, SearchIndexError> {
            self.record(format!("search {}", kind)).await?;
            Ok(self.hits.clone())
        }

        async fn health_check(&self) -> Result<(), SearchIndexError> {
            Ok(())
        }
    }

    fn service(provider: &Arc<MockProvider>) -> SearchService {
        SearchService::new(SearchIndexClient::new(provider.clone()))
    }

    #[tokio::test]
    async fn test_batch_ensures_index_first() {
        let provider = Arc::new(MockProvider::default());

        service(&provider)
            .index_nodes(vec![
                Node {
                    id: 1,
                    ..Default::default()
                },
                Node {
                    id: 2,
                    ..Default::default()
                },
            ])
            .await
            .unwrap();

        assert_eq!(
            *provider.calls.lock().await,
            vec!["ensure nodes".to_string(), "bulk nodes 2".to_string()]
        );
    }

    #[tokio::test]
    async fn test_single_index_does_not_ensure() {
        let provider = Arc::new(MockProvider::default());

        service(&provider)
            .index_address(Address {
                house_id: 7,
                street_name: "Baker".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(
            *provider.calls.lock().await,
            vec!["index addresses 7".to_string()]
        );
    }

    #[tokio::test]
    async fn test_ensure_failure_stops_batch() {
        let provider = Arc::new(MockProvider {
            fail_ensure: true,
            ..Default::default()
        });

        let err = service(&provider)
            .index_hardware_batch(vec![Hardware {
                id: 1,
                ..Default::default()
            }])
            .await
            .unwrap_err();

        assert_eq!(err, ServiceError::Internal("failed to ensure index"));
        assert_eq!(*provider.calls.lock().await, vec!["ensure hardware".to_string()]);
    }

    #[tokio::test]
    async fn test_errors_are_opaque() {
        let provider = Arc::new(MockProvider {
            fail_all: true,
            ..Default::default()
        });
        let service = service(&provider);

        let err = service
            .search_addresses(&AddressQuery::street("Baker", 0, 10))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "failed to search addresses");
        assert_eq!(err.status(), "Internal");

        let err = service
            .index_node(Node {
                id: 1,
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "failed to index node");
        assert!(!err.to_string().contains("10.1.2.3"));
    }

    #[tokio::test]
    async fn test_search_returns_hits() {
        let provider = Arc::new(MockProvider {
            hits: SearchHits {
                ids: vec![12, 4],
                total: 40,
            },
            ..Default::default()
        });

        let hits = service(&provider)
            .search_hardware(
                &SearchQuery::new("switch", 0, 2),
                &HardwareFilter::default().with_is_delete(false),
            )
            .await
            .unwrap();

        assert_eq!(hits.ids, vec![12, 4]);
        assert_eq!(hits.total, 40);
        assert_eq!(*provider.calls.lock().await, vec!["search hardware".to_string()]);
    }
}
