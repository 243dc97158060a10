//! Consumer module for the search service pipeline.
//!
//! Provides the message source abstraction, its Kafka implementation and the
//! payload types of the indexing topics.

mod kafka_consumer;
mod messages;
mod source;

pub use kafka_consumer::KafkaConsumer;
pub use messages::{AddressMessage, HardwareMessage, NodeMessage, SourceMessage, BATCH, SINGLE};
pub use source::MessageSource;
