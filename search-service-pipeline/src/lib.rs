//! # Search Service Pipeline
//!
//! This crate provides the pipeline components for consuming entity messages
//! from Kafka and indexing them into OpenSearch.
//!
//! ## Architecture
//!
//! The pipeline follows the Consumer-Processor-Loader pattern, once per
//! index kind:
//!
//! 1. **Consumer**: Receives messages from the kind's Kafka topic
//! 2. **Processor**: Decodes payloads into single or batch indexing commands
//! 3. **Loader**: Ensures the index exists and writes the entities
//! 4. **Orchestrator**: Runs one consumer task per kind and handles shutdown

pub mod consumer;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;

#[cfg(test)]
mod testing;

pub use errors::PipelineError;
