//! Client-side limits applied before a request reaches the backend.

/// Limits enforced by [`SearchIndexClient`](crate::SearchIndexClient).
///
/// The default places no limit on batch writes, so a whole message batch
/// always goes out as one bulk request.
#[derive(Debug, Clone, Default)]
pub struct SearchIndexConfig {
    /// Largest batch accepted by the batch write operations.
    pub max_batch_size: Option<usize>,
}

impl SearchIndexConfig {
    /// Reject batches larger than `max_batch_size`.
    pub fn with_max_batch_size(max_batch_size: usize) -> Self {
        Self {
            max_batch_size: Some(max_batch_size),
        }
    }

    /// Build from an optional limit, `None` meaning unlimited.
    pub fn from_limit(max_batch_size: Option<usize>) -> Self {
        Self { max_batch_size }
    }
}
