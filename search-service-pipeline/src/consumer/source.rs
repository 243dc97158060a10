//! Message source abstraction.

use async_trait::async_trait;

use crate::consumer::messages::SourceMessage;
use crate::errors::PipelineError;

/// A stream of messages bound to one topic.
///
/// Kafka in production; tests feed messages through a channel.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Wait for the next message.
    ///
    /// # Returns
    ///
    /// * `Ok(SourceMessage)` - The next message
    /// * `Err(PipelineError::SourceClosed)` - If no more messages will arrive
    /// * `Err(PipelineError::KafkaError)` - If reading failed at the transport level
    async fn next_message(&self) -> Result<SourceMessage, PipelineError>;

    /// Mark `message` as handled so it is not delivered again after a restart.
    async fn commit(&self, message: &SourceMessage) -> Result<(), PipelineError>;
}
