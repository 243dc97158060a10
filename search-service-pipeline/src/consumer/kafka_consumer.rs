//! Kafka consumer implementation for the search service.
//!
//! Each consumer is subscribed to the topic of a single index kind.

use async_trait::async_trait;
use rdkafka::{
    config::ClientConfig,
    consumer::{CommitMode, Consumer, StreamConsumer},
    error::{KafkaError, RDKafkaErrorCode},
    message::Message as KafkaMessage,
    Offset, TopicPartitionList,
};
use tracing::{debug, info};

use crate::consumer::messages::SourceMessage;
use crate::consumer::source::MessageSource;
use crate::errors::PipelineError;
use search_service_shared::IndexKind;

/// Kafka consumer for one entity topic.
pub struct KafkaConsumer {
    consumer: StreamConsumer,
    kind: IndexKind,
}

impl KafkaConsumer {
    /// Create a new Kafka consumer for the topic of `kind`.
    ///
    /// # Arguments
    ///
    /// * `brokers` - Kafka broker addresses (comma-separated)
    /// * `group_id` - Consumer group ID
    /// * `kind` - Selects the topic to read
    ///
    /// # Returns
    ///
    /// * `Ok(KafkaConsumer)` - A new consumer instance
    /// * `Err(PipelineError)` - If consumer creation fails
    pub fn new(brokers: &str, group_id: &str, kind: IndexKind) -> Result<Self, PipelineError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("group.id", group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", "6000")
            .create()
            .map_err(|e| PipelineError::kafka(e.to_string()))?;

        info!(
            brokers = %brokers,
            group_id = %group_id,
            topic = kind.topic(),
            "Created Kafka consumer"
        );

        Ok(Self { consumer, kind })
    }

    /// Subscribe to the topic of this consumer's kind.
    pub fn subscribe(&self) -> Result<(), PipelineError> {
        self.consumer
            .subscribe(&[self.kind.topic()])
            .map_err(|e| PipelineError::kafka(e.to_string()))?;

        info!(topic = self.kind.topic(), "Subscribed to Kafka topic");
        Ok(())
    }
}

#[async_trait]
impl MessageSource for KafkaConsumer {
    async fn next_message(&self) -> Result<SourceMessage, PipelineError> {
        let msg = self.consumer.recv().await.map_err(classify)?;

        let message = SourceMessage {
            topic: msg.topic().to_string(),
            partition: msg.partition(),
            offset: msg.offset(),
            payload: msg.payload().map(<[u8]>::to_vec),
        };

        debug!(
            topic = %message.topic,
            partition = message.partition,
            offset = message.offset,
            "Received message"
        );

        Ok(message)
    }

    async fn commit(&self, message: &SourceMessage) -> Result<(), PipelineError> {
        let mut tpl = TopicPartitionList::new();
        tpl.add_partition_offset(
            &message.topic,
            message.partition,
            Offset::Offset(message.offset + 1),
        )?;

        self.consumer.commit(&tpl, CommitMode::Async)?;
        Ok(())
    }
}

/// Sort a consume error into one the client recovers from on its own and
/// one that ends the consumer.
fn classify(err: KafkaError) -> PipelineError {
    match &err {
        KafkaError::MessageConsumption(code) if is_recoverable(code) => {
            PipelineError::recoverable_kafka(err.to_string())
        }
        _ => PipelineError::from(err),
    }
}

/// Codes librdkafka reports while it keeps retrying in the background.
fn is_recoverable(code: &RDKafkaErrorCode) -> bool {
    matches!(
        code,
        RDKafkaErrorCode::UnknownTopicOrPartition
            | RDKafkaErrorCode::UnknownTopic
            | RDKafkaErrorCode::UnknownPartition
            | RDKafkaErrorCode::PartitionEOF
    )
}
