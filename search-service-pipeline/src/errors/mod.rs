//! Error types for the search service pipeline.

use search_service_repository::SearchIndexError;
use thiserror::Error;

/// Errors that can occur in the search service pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Kafka-related error.
    #[error("Kafka error: {0}")]
    KafkaError(String),

    /// Kafka reported a condition the client recovers from by itself, such
    /// as a subscribed topic that does not exist yet.
    #[error("Recoverable Kafka error: {0}")]
    RecoverableKafkaError(String),

    /// Error parsing or decoding a message payload.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The message discriminator named neither a single entity nor a batch.
    #[error("Unknown message type: {0}")]
    UnknownMessageType(String),

    /// The message source has no more messages.
    #[error("Message source closed")]
    SourceClosed,

    /// Error from the search index.
    #[error("Search index error: {0}")]
    SearchIndex(#[from] SearchIndexError),
}

impl PipelineError {
    /// Create a Kafka error.
    pub fn kafka(msg: impl Into<String>) -> Self {
        Self::KafkaError(msg.into())
    }

    /// Create a recoverable Kafka error.
    pub fn recoverable_kafka(msg: impl Into<String>) -> Self {
        Self::RecoverableKafkaError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Decode and discriminator failures skip the message; anything else is
    /// about the source or the index.
    pub fn is_message_error(&self) -> bool {
        matches!(self, Self::ParseError(_) | Self::UnknownMessageType(_))
    }

    /// The source can keep being polled after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::RecoverableKafkaError(_))
    }
}

impl From<rdkafka::error::KafkaError> for PipelineError {
    fn from(err: rdkafka::error::KafkaError) -> Self {
        Self::KafkaError(err.to_string())
    }
}
