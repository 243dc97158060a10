//! Dependency initialization and wiring for the search service.

use std::sync::Arc;
use tracing::info;

use crate::config::ServiceConfig;
use crate::service::SearchService;
use crate::IndexingError;
use search_service_pipeline::{
    consumer::KafkaConsumer,
    loader::SearchLoader,
    orchestrator::{ConsumerTask, Orchestrator},
};
use search_service_repository::{
    IndexConfig, OpenSearchClient, SearchIndexClient, SearchIndexConfig,
};
use search_service_shared::IndexKind;

/// Container for all initialized dependencies.
///
/// The orchestrator and the service share one search index client.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
    /// The index/search facade for request handlers.
    pub service: SearchService,
}

impl Dependencies {
    /// Initialize all dependencies from the given configuration.
    ///
    /// Fails if OpenSearch is unreachable or its cluster is red, if an index
    /// cannot be provisioned, or if a Kafka consumer cannot be created or
    /// subscribed.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If initialization fails
    pub async fn new(config: &ServiceConfig) -> Result<Self, IndexingError> {
        info!(
            opensearch_url = %config.opensearch_url,
            kafka_broker = %config.kafka_broker,
            kafka_group_id = %config.kafka_group_id,
            index_prefix = %config.index_prefix,
            "Initializing dependencies"
        );

        // Initialize OpenSearch client
        let provider =
            OpenSearchClient::new(&config.opensearch_url, IndexConfig::new(&config.index_prefix))
                .await
                .map_err(|e| {
                    IndexingError::config(format!("Failed to create OpenSearch client: {}", e))
                })?;

        let client = SearchIndexClient::with_config(
            Arc::new(provider),
            SearchIndexConfig::from_limit(config.max_batch_size),
        );

        // Verify OpenSearch is reachable
        client.health_check().await.map_err(|e| {
            IndexingError::config(format!("OpenSearch health check failed: {}", e))
        })?;

        info!("OpenSearch connection verified");

        client.ensure_all_indices().await?;

        // One consumer per index kind, each on its own topic
        let mut tasks = Vec::with_capacity(IndexKind::ALL.len());
        for kind in IndexKind::ALL {
            let consumer = KafkaConsumer::new(&config.kafka_broker, &config.kafka_group_id, kind)
                .map_err(|e| {
                    IndexingError::config(format!("Failed to create Kafka consumer: {}", e))
                })?;
            consumer.subscribe()?;

            tasks.push(ConsumerTask::new(
                kind,
                Box::new(consumer),
                SearchLoader::new(client.clone()),
            ));
        }

        info!(consumers = tasks.len(), "Kafka consumers created");

        Ok(Self {
            orchestrator: Orchestrator::new(tasks),
            service: SearchService::new(client),
        })
    }
}
