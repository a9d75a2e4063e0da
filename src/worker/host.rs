//! Event loop delivering lifecycle events to a cache controller.
//!
//! Each event carries a reply channel that is answered only once the
//! event's work has settled. Install and activate run one at a time in
//! arrival order. Fetches run concurrently with each other.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use super::{CacheController, CacheStorage, FetchOutcome, FetchRequest, Network, WorkerState};
use crate::error::{Error, Result};

enum WorkerEvent {
    Install(oneshot::Sender<Result<()>>),
    Activate(oneshot::Sender<Result<Vec<String>>>),
    Fetch(FetchRequest, oneshot::Sender<Result<FetchOutcome>>),
    State(oneshot::Sender<WorkerState>),
}

/// Handle used to deliver events to a running worker.
///
/// The worker stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    tx: mpsc::UnboundedSender<WorkerEvent>,
}

impl std::fmt::Debug for WorkerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Install(_) => f.write_str("Install"),
            Self::Activate(_) => f.write_str("Activate"),
            Self::Fetch(request, _) => write!(f, "Fetch({} {})", request.method, request.url),
            Self::State(_) => f.write_str("State"),
        }
    }
}

/// Starts a worker task for `controller` on the current tokio runtime.
pub fn spawn_worker<S, N>(controller: CacheController<S, N>) -> WorkerHandle
where
    S: CacheStorage + 'static,
    N: Network + 'static,
{
    let controller = Arc::new(controller);
    let (tx, mut rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            log::debug!("Worker {} received {event:?}", controller.cache_name());
            match event {
                WorkerEvent::Install(reply) => {
                    let _ = reply.send(controller.install().await);
                }
                WorkerEvent::Activate(reply) => {
                    let _ = reply.send(controller.activate().await);
                }
                WorkerEvent::Fetch(request, reply) => {
                    let controller = Arc::clone(&controller);
                    tokio::spawn(async move {
                        let _ = reply.send(controller.fetch(&request).await);
                    });
                }
                WorkerEvent::State(reply) => {
                    let _ = reply.send(controller.state());
                }
            }
        }
        log::debug!("Worker {} stopped", controller.cache_name());
    });

    WorkerHandle { tx }
}

impl WorkerHandle {
    async fn send<T>(&self, event: impl FnOnce(oneshot::Sender<T>) -> WorkerEvent) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(event(reply)).map_err(|_| Error::WorkerGone)?;
        rx.await.map_err(|_| Error::WorkerGone)
    }

    /// Delivers the install event and waits for it to settle.
    ///
    /// # Errors
    ///
    /// Returns the install failure, or [`Error::WorkerGone`] if the worker stopped.
    pub async fn install(&self) -> Result<()> {
        self.send(WorkerEvent::Install).await?
    }

    /// Delivers the activate event and returns the deleted bucket names.
    ///
    /// # Errors
    ///
    /// Returns the activation failure, or [`Error::WorkerGone`] if the worker stopped.
    pub async fn activate(&self) -> Result<Vec<String>> {
        self.send(WorkerEvent::Activate).await?
    }

    /// Delivers a fetch event and waits for the response.
    ///
    /// # Errors
    ///
    /// Returns the fetch failure, or [`Error::WorkerGone`] if the worker stopped.
    pub async fn fetch(&self, request: FetchRequest) -> Result<FetchOutcome> {
        self.send(|reply| WorkerEvent::Fetch(request, reply)).await?
    }

    /// Returns the worker's lifecycle state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerGone`] if the worker stopped.
    pub async fn state(&self) -> Result<WorkerState> {
        self.send(WorkerEvent::State).await
    }
}
