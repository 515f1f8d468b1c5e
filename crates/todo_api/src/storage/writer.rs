//! Write-behind queue for newly created entities.
//!
//! Each entity type gets one [`WriteQueue`] and one background worker. The
//! queue hands the entity and a oneshot sender to the worker; the worker
//! persists it through an [`EntitySink`] and always resolves the sender, so
//! the submitting request learns the outcome of every accepted write.
//!
//! Writes are processed one at a time, in submission order.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use todo_api_core::storage::{EntitySink, RepositoryError, Result};
use todo_api_core::todo::Entity;

/// Lifecycle of a write worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    /// Waiting on the queue.
    Idle,
    /// A message was dequeued.
    Receiving,
    /// The store transaction is running.
    Persisting,
    /// The transaction committed; the caller is being acknowledged.
    Committed,
    /// The transaction rolled back; the caller is being told why.
    Failed,
    /// Shutdown finished and the queue no longer accepts writes.
    Stopped,
}

/// Configuration for a write worker.
#[derive(Debug, Clone, Copy)]
pub struct WriterConfig {
    /// Number of writes that may wait in the queue.
    pub capacity: usize,
    /// How long `submit` waits for a free queue slot.
    pub submit_timeout: Duration,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            capacity: 32,
            submit_timeout: Duration::from_secs(10),
        }
    }
}

/// A write waiting for the worker.
struct WriteRequest<E> {
    entity: E,
    response_tx: oneshot::Sender<Result<E>>,
}

/// Handle for submitting entities to a write worker.
pub struct WriteQueue<E: Entity> {
    tx: mpsc::Sender<WriteRequest<E>>,
    state: watch::Receiver<WorkerState>,
    submit_timeout: Duration,
}

impl<E: Entity> Clone for WriteQueue<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            state: self.state.clone(),
            submit_timeout: self.submit_timeout,
        }
    }
}

fn unavailable<E: Entity>(reason: impl Into<String>) -> RepositoryError {
    RepositoryError::WriterUnavailable {
        entity_type: E::KIND,
        reason: reason.into(),
    }
}

impl<E: Entity> WriteQueue<E> {
    /// Submits `entity` and waits until the worker has persisted it.
    ///
    /// The timeout only covers waiting for a queue slot. Once the worker
    /// owns the message the caller waits for its result, so a committed
    /// write is never reported as failed.
    pub async fn submit(&self, entity: E) -> Result<E> {
        let (response_tx, response_rx) = oneshot::channel();
        let request = WriteRequest {
            entity,
            response_tx,
        };

        match tokio::time::timeout(self.submit_timeout, self.tx.send(request)).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => return Err(unavailable::<E>("write queue is closed")),
            Err(_) => {
                return Err(unavailable::<E>(format!(
                    "write queue stayed full for {}s",
                    self.submit_timeout.as_secs()
                )))
            }
        }

        response_rx
            .await
            .map_err(|_| unavailable::<E>("worker dropped the acknowledgement"))?
    }

    /// Returns the worker's current state.
    pub fn state(&self) -> WorkerState {
        *self.state.borrow()
    }
}

/// Spawns write workers.
pub struct WriteWorker;

impl WriteWorker {
    /// Starts the worker for entity type `E` on the current runtime.
    ///
    /// The worker runs until `shutdown` fires (or its sender is dropped).
    /// It then stops accepting new writes, persists everything already
    /// queued, and exits.
    pub fn spawn<E, S>(
        sink: Arc<S>,
        config: WriterConfig,
        shutdown: broadcast::Receiver<()>,
    ) -> (WriteQueue<E>, JoinHandle<()>)
    where
        E: Entity,
        S: EntitySink<E> + ?Sized + 'static,
    {
        let (tx, rx) = mpsc::channel(config.capacity.max(1));
        let (state_tx, state_rx) = watch::channel(WorkerState::Idle);

        let handle = tokio::spawn(run_worker(sink, rx, state_tx, shutdown));

        let queue = WriteQueue {
            tx,
            state: state_rx,
            submit_timeout: config.submit_timeout,
        };
        (queue, handle)
    }
}

async fn run_worker<E, S>(
    sink: Arc<S>,
    mut rx: mpsc::Receiver<WriteRequest<E>>,
    state_tx: watch::Sender<WorkerState>,
    mut shutdown: broadcast::Receiver<()>,
) where
    E: Entity,
    S: EntitySink<E> + ?Sized + 'static,
{
    tracing::debug!(entity = E::KIND, "Write worker started");

    loop {
        tokio::select! {
            biased;
            _ = shutdown.recv() => {
                tracing::debug!(entity = E::KIND, "Write worker received shutdown signal");
                break;
            }
            request = rx.recv() => match request {
                Some(request) => process(sink.as_ref(), request, &state_tx).await,
                None => break,
            },
        }
    }

    // Reject new writes, then finish the ones already accepted.
    rx.close();
    let mut drained = 0usize;
    while let Some(request) = rx.recv().await {
        process(sink.as_ref(), request, &state_tx).await;
        drained += 1;
    }

    state_tx.send_replace(WorkerState::Stopped);
    tracing::debug!(entity = E::KIND, drained, "Write worker shutting down");
}

async fn process<E, S>(sink: &S, request: WriteRequest<E>, state_tx: &watch::Sender<WorkerState>)
where
    E: Entity,
    S: EntitySink<E> + ?Sized,
{
    state_tx.send_replace(WorkerState::Receiving);
    let WriteRequest {
        entity,
        response_tx,
    } = request;

    state_tx.send_replace(WorkerState::Persisting);
    let result = sink.persist(entity).await;

    match &result {
        Ok(stored) => {
            state_tx.send_replace(WorkerState::Committed);
            tracing::debug!(entity = E::KIND, id = stored.id(), "Write committed");
        }
        Err(e) => {
            state_tx.send_replace(WorkerState::Failed);
            tracing::error!(entity = E::KIND, error = %e, "Write failed");
        }
    }

    if response_tx.send(result).is_err() {
        tracing::warn!(entity = E::KIND, "Writer caller went away before acknowledgement");
    }

    state_tx.send_replace(WorkerState::Idle);
}
