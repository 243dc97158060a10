//! Error types for the search service repository.

mod search_index_error;

pub use search_index_error::SearchIndexError;
