//! Orchestrator module for the search service pipeline.
//!
//! Runs one consumer task per index kind and coordinates their shutdown.

use std::future::Future;

use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

use crate::consumer::{MessageSource, SourceMessage};
use crate::errors::PipelineError;
use crate::loader::SearchLoader;
use crate::processor::EntityProcessor;
use search_service_shared::IndexKind;

/// Consumes the topic of one index kind until shutdown or until the source
/// fails.
pub struct ConsumerTask {
    kind: IndexKind,
    source: Box<dyn MessageSource>,
    processor: EntityProcessor,
    loader: SearchLoader,
}

impl ConsumerTask {
    pub fn new(kind: IndexKind, source: Box<dyn MessageSource>, loader: SearchLoader) -> Self {
        Self {
            kind,
            source,
            processor: EntityProcessor::new(),
            loader,
        }
    }

    pub fn kind(&self) -> IndexKind {
        self.kind
    }

    /// Run the consume loop.
    ///
    /// Returns `Ok(())` after a shutdown signal, or the terminal source error
    /// otherwise. Recoverable source errors are logged and polling goes on. A message being handled when the signal arrives is finished
    /// first.
    #[instrument(skip_all, fields(kind = %self.kind))]
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> Result<(), PipelineError> {
        info!(topic = self.kind.topic(), "Consumer started");

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("Consumer received shutdown signal");
                    return Ok(());
                }
                message = self.source.next_message() => {
                    let message = match message {
                        Ok(message) => message,
                        Err(e) if e.is_recoverable() => {
                            warn!(error = %e, "Kafka reported a recoverable error, still polling");
                            continue;
                        }
                        Err(e) => return Err(e),
                    };
                    self.handle(&message).await;

                    if let Err(e) = self.source.commit(&message).await {
                        warn!(error = %e, offset = message.offset, "Failed to commit offset");
                    }
                }
            }
        }
    }

    /// Decode and load one message. Every failure here is logged and the
    /// message is dropped.
    async fn handle(&self, message: &SourceMessage) {
        let payload = match &message.payload {
            Some(payload) => payload,
            None => {
                debug!(offset = message.offset, "Received message with empty payload");
                return;
            }
        };

        let processed = match self.processor.process(self.kind, payload) {
            Ok(Some(processed)) => processed,
            Ok(None) => return,
            Err(e) if e.is_message_error() => {
                warn!(error = %e, offset = message.offset, "Skipping undecodable message");
                return;
            }
            Err(e) => {
                error!(error = %e, offset = message.offset, "Failed to process message");
                return;
            }
        };

        if let Err(e) = self.loader.load(processed).await {
            error!(error = %e, offset = message.offset, "Failed to index message");
        }
    }
}

/// Orchestrator that runs the consumer tasks.
///
/// Tasks are independent: one task ending, for any reason, does not stop the
/// others, and an ended task is not restarted.
pub struct Orchestrator {
    tasks: Vec<ConsumerTask>,
    shutdown_tx: broadcast::Sender<()>,
}

impl Orchestrator {
    /// Create a new orchestrator over the given tasks.
    pub fn new(tasks: Vec<ConsumerTask>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self { tasks, shutdown_tx }
    }

    /// Run until Ctrl-C, then wait for every task to stop.
    pub async fn run(self) -> Vec<(IndexKind, Result<(), PipelineError>)> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl-C");
                futures::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run until `shutdown_signal` resolves or every task has ended.
    ///
    /// # Returns
    ///
    /// The terminal outcome of each task, in completion order.
    pub async fn run_until<F>(self, shutdown_signal: F) -> Vec<(IndexKind, Result<(), PipelineError>)>
    where
        F: Future<Output = ()>,
    {
        info!(tasks = self.tasks.len(), "Starting search service orchestrator");

        let mut running = JoinSet::new();
        for task in self.tasks {
            let shutdown_rx = self.shutdown_tx.subscribe();
            running.spawn(async move {
                let kind = task.kind();
                (kind, task.run(shutdown_rx).await)
            });
        }

        tokio::pin!(shutdown_signal);
        let mut signalled = false;
        let mut outcomes = Vec::new();

        loop {
            tokio::select! {
                _ = &mut shutdown_signal, if !signalled => {
                    info!("Received shutdown signal");
                    signalled = true;
                    let _ = self.shutdown_tx.send(());
                }
                joined = running.join_next() => match joined {
                    Some(Ok((kind, result))) => {
                        match &result {
                            Ok(()) => info!(kind = %kind, "Consumer stopped"),
                            Err(e) => error!(kind = %kind, error = %e, "Consumer terminated"),
                        }
                        outcomes.push((kind, result));
                    }
                    Some(Err(e)) => error!(error = %e, "Consumer task panicked"),
                    None => break,
                },
            }
        }

        info!("Orchestrator shutdown complete");
        outcomes
    }
}
