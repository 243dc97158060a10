//! Processor module for the search service pipeline.
//!
//! Decodes topic payloads into indexing commands.

mod entity_processor;

pub use entity_processor::{EntityProcessor, IndexCommand, ProcessedMessage};
