//! Loader module for the search service pipeline.
//!
//! Writes decoded indexing commands into the search index.

use tracing::{debug, error, instrument};

use crate::errors::PipelineError;
use crate::processor::{IndexCommand, ProcessedMessage};
use search_service_repository::SearchIndexClient;

/// Loader that indexes entities into the search engine.
///
/// Every load first makes sure the target index exists, then writes the
/// single entity or the whole batch in one request.
#[derive(Clone)]
pub struct SearchLoader {
    client: SearchIndexClient,
}

impl SearchLoader {
    /// Create a new search loader with the given client.
    pub fn new(client: SearchIndexClient) -> Self {
        Self { client }
    }

    /// Load one decoded message.
    ///
    /// A failure to provision the index is logged and the write is still
    /// attempted; the write reports its own error if the index is unusable.
    #[instrument(skip(self, message), fields(kind = %message.kind(), count = message.len()))]
    pub async fn load(&self, message: ProcessedMessage) -> Result<(), PipelineError> {
        let kind = message.kind();

        if let Err(e) = self.client.ensure_index(kind).await {
            error!(error = %e, "Failed to ensure index");
        }

        let count = message.len();
        match message {
            ProcessedMessage::Nodes(IndexCommand::Single(node)) => {
                self.client.index_node(node).await?
            }
            ProcessedMessage::Nodes(IndexCommand::Batch(nodes)) => {
                self.client.index_nodes(nodes).await?
            }
            ProcessedMessage::Hardware(IndexCommand::Single(hardware)) => {
                self.client.index_hardware(hardware).await?
            }
            ProcessedMessage::Hardware(IndexCommand::Batch(hardware)) => {
                self.client.index_hardware_batch(hardware).await?
            }
            ProcessedMessage::Addresses(IndexCommand::Single(address)) => {
                self.client.index_address(address).await?
            }
            ProcessedMessage::Addresses(IndexCommand::Batch(addresses)) => {
                self.client.index_addresses(addresses).await?
            }
        }

        debug!(count, "Indexed entities");
        Ok(())
    }
}
