//! In-memory stand-ins for the search index and the message stream.

use std::collections::{BTreeMap, HashMap, VecDeque};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, Mutex};

use crate::consumer::{MessageSource, SourceMessage};
use crate::errors::PipelineError;
use search_service_repository::dsl::SearchRequest;
use search_service_repository::{IndexDocument, SearchIndexError, SearchIndexProvider};
use search_service_shared::{IndexKind, SearchHits};

/// Provider recording every call as a short line, e.g. `"bulk nodes 1,2"`.
#[derive(Default)]
pub(crate) struct RecordingProvider {
    pub(crate) calls: Mutex<Vec<String>>,
    pub(crate) documents: Mutex<HashMap<IndexKind, BTreeMap<String, Value>>>,
    pub fail_ensure: bool,
    pub fail_writes: bool,
}

impl RecordingProvider {
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub async fn documents(&self, kind: IndexKind) -> Vec<String> {
        self.documents
            .lock()
            .await
            .get(&kind)
            .map(|docs| docs.keys().cloned().collect())
            .unwrap_or_default()
    }

    async fn record(&self, call: String) {
        self.calls.lock().await.push(call);
    }
}

#[async_trait]
impl SearchIndexProvider for RecordingProvider {
    async fn ensure_index(&self, kind: IndexKind) -> Result<(), SearchIndexError> {
        self.record(format!("ensure {}", kind)).await;
        if self.fail_ensure {
            return Err(SearchIndexError::index_creation("cluster read-only"));
        }
        Ok(())
    }

    async fn index_document(
        &self,
        kind: IndexKind,
        document: IndexDocument,
    ) -> Result<(), SearchIndexError> {
        self.record(format!("index {} {}", kind, document.id)).await;
        if self.fail_writes {
            return Err(SearchIndexError::index("rejected"));
        }
        self.documents
            .lock()
            .await
            .entry(kind)
            .or_default()
            .insert(document.id, document.body);
        Ok(())
    }

    async fn bulk_index_documents(
        &self,
        kind: IndexKind,
        documents: Vec<IndexDocument>,
    ) -> Result<(), SearchIndexError> {
        let ids: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
        self.record(format!("bulk {} {}", kind, ids.join(","))).await;
        if self.fail_writes {
            return Err(SearchIndexError::bulk_operation("bulk indexing had errors"));
        }
        let mut stored = self.documents.lock().await;
        let index = stored.entry(kind).or_default();
        for document in documents {
            index.insert(document.id, document.body);
        }
        Ok(())
    }

    async fn search(
        &self,
        kind: IndexKind,
        _request: &SearchRequest,
    ) -> Result<SearchHits, SearchIndexError> {
        self.record(format!("search {}", kind)).await;
        Ok(SearchHits::empty())
    }

    async fn health_check(&self) -> Result<(), SearchIndexError> {
        Ok(())
    }
}

/// Message source fed through a channel. Closing the sender closes the
/// source. Queued errors are returned before any message.
pub(crate) struct ChannelSource {
    receiver: Mutex<mpsc::UnboundedReceiver<SourceMessage>>,
    errors: Mutex<VecDeque<PipelineError>>,
    committed: Mutex<Vec<i64>>,
}

impl ChannelSource {
    pub fn new() -> (mpsc::UnboundedSender<SourceMessage>, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let source = Self {
            receiver: Mutex::new(receiver),
            errors: Mutex::new(VecDeque::new()),
            committed: Mutex::new(Vec::new()),
        };
        (sender, source)
    }

    pub async fn fail_next(&self, error: PipelineError) {
        self.errors.lock().await.push_back(error);
    }

    pub async fn committed(&self) -> Vec<i64> {
        self.committed.lock().await.clone()
    }
}

#[async_trait]
impl MessageSource for ChannelSource {
    async fn next_message(&self) -> Result<SourceMessage, PipelineError> {
        if let Some(error) = self.errors.lock().await.pop_front() {
            return Err(error);
        }
        self.receiver
            .lock()
            .await
            .recv()
            .await
            .ok_or(PipelineError::SourceClosed)
    }

    async fn commit(&self, message: &SourceMessage) -> Result<(), PipelineError> {
        self.committed.lock().await.push(message.offset);
        Ok(())
    }
}

/// A message on the topic of `kind` carrying `payload`.
pub(crate) fn message(kind: IndexKind, offset: i64, payload: &str) -> SourceMessage {
    SourceMessage {
        topic: kind.topic().to_string(),
        partition: 0,
        offset,
        payload: Some(payload.as_bytes().to_vec()),
    }
}
