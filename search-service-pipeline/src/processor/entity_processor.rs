//! Entity processor implementation.
//!
//! Decodes topic payloads into indexing commands.

use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::consumer::{AddressMessage, HardwareMessage, NodeMessage, BATCH, SINGLE};
use crate::errors::PipelineError;
use search_service_shared::{Address, Hardware, IndexKind, Node};

/// What a message asks to be indexed.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexCommand<T> {
    Single(T),
    Batch(Vec<T>),
}

impl<T> IndexCommand<T> {
    pub fn len(&self) -> usize {
        match self {
            IndexCommand::Single(_) => 1,
            IndexCommand::Batch(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A decoded message ready for loading.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessedMessage {
    Nodes(IndexCommand<Node>),
    Hardware(IndexCommand<Hardware>),
    Addresses(IndexCommand<Address>),
}

impl ProcessedMessage {
    pub fn kind(&self) -> IndexKind {
        match self {
            ProcessedMessage::Nodes(_) => IndexKind::Nodes,
            ProcessedMessage::Hardware(_) => IndexKind::Hardware,
            ProcessedMessage::Addresses(_) => IndexKind::Addresses,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ProcessedMessage::Nodes(command) => command.len(),
            ProcessedMessage::Hardware(command) => command.len(),
            ProcessedMessage::Addresses(command) => command.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Processor that turns raw payloads into indexing commands.
///
/// `Ok(None)` means the message was well formed but carries nothing to
/// index, e.g. a batch with an empty array.
#[derive(Debug, Default)]
pub struct EntityProcessor;

impl EntityProcessor {
    /// Create a new entity processor.
    pub fn new() -> Self {
        Self
    }

    /// Decode a payload read from the topic of `kind`.
    #[instrument(skip(self, payload), fields(bytes = payload.len()))]
    pub fn process(
        &self,
        kind: IndexKind,
        payload: &[u8],
    ) -> Result<Option<ProcessedMessage>, PipelineError> {
        let processed = match kind {
            IndexKind::Nodes => {
                let message: NodeMessage = decode(kind, payload)?;
                select(&message.message_type, message.node, message.nodes)?
                    .map(ProcessedMessage::Nodes)
            }
            IndexKind::Hardware => {
                let message: HardwareMessage = decode(kind, payload)?;
                select(
                    &message.message_type,
                    message.hardware_single,
                    message.hardware,
                )?
                .map(ProcessedMessage::Hardware)
            }
            IndexKind::Addresses => {
                let message: AddressMessage = decode(kind, payload)?;
                select_addresses(message).map(ProcessedMessage::Addresses)
            }
        };

        match &processed {
            Some(message) => debug!(count = message.len(), "Decoded indexing command"),
            None => debug!("Message carries nothing to index"),
        }

        Ok(processed)
    }
}

fn decode<T: DeserializeOwned>(kind: IndexKind, payload: &[u8]) -> Result<T, PipelineError> {
    serde_json::from_slice(payload).map_err(|e| {
        PipelineError::parse(format!("Failed to decode {} message: {}", kind, e))
    })
}

/// Pick the single entity or the batch named by the discriminator.
fn select<T>(
    message_type: &str,
    single: Option<T>,
    batch: Option<Vec<T>>,
) -> Result<Option<IndexCommand<T>>, PipelineError> {
    match message_type {
        SINGLE => Ok(single.map(IndexCommand::Single)),
        BATCH => Ok(batch
            .filter(|items| !items.is_empty())
            .map(IndexCommand::Batch)),
        other => Err(PipelineError::UnknownMessageType(other.to_string())),
    }
}

/// Addresses are indexed from the array alone, whatever the discriminator
/// says. Single-address messages are not indexed.
fn select_addresses(message: AddressMessage) -> Option<IndexCommand<Address>> {
    match message.addresses {
        Some(addresses) if !addresses.is_empty() => Some(IndexCommand::Batch(addresses)),
        _ => {
            if message.address.is_some() {
                warn!(
                    message_type = %message.message_type,
                    "Single address messages are not indexed, send a batch instead"
                );
            }
            None
        }
    }
}
