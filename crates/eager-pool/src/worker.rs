use crate::{Error, Result};
use crossbeam_channel::{Receiver, SendError, Sender, TrySendError};
use portable_atomic::{AtomicBool, AtomicUsize, Ordering};
use std::{sync::Arc, thread};

/// The job every worker runs for each item it receives.
///
/// Supplied once at construction and shared read-only by all workers.
pub type Job<T> = Arc<dyn Fn(T) + Send + Sync + 'static>;

/// State shared between a [`Worker`] handle and its thread.
#[derive(Debug)]
pub(crate) struct WorkerState {
    /// Set while the job is running. Written only by the worker thread.
    busy: AtomicBool,
    /// Items accepted by the dispatcher that the worker has not dequeued yet.
    pending: AtomicUsize,
}

impl WorkerState {
    const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
            pending: AtomicUsize::new(0),
        }
    }
}

/// Dispatcher-side handle to one worker thread.
///
/// The handle owns the sending half of the worker's bounded queue. Dropping it
/// disconnects the queue; the thread drains what is left and exits.
pub(crate) struct Worker<T> {
    tx: Sender<T>,
    state: Arc<WorkerState>,
}

impl<T: Send + 'static> Worker<T> {
    /// Spawns the worker thread `{thread_name}-{worker_id}` with a queue of
    /// `capacity` items.
    pub(crate) fn spawn(
        worker_id: usize,
        capacity: usize,
        thread_name: &str,
        job: Job<T>,
    ) -> Result<Self> {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        let state = Arc::new(WorkerState::new());

        let thread_state = Arc::clone(&state);
        thread::Builder::new()
            .name(format!("{thread_name}-{worker_id}"))
            .spawn(move || worker_loop(worker_id, &rx, &thread_state, &*job))
            .map_err(|source| Error::Spawn {
                worker: worker_id,
                source,
            })?;

        Ok(Self { tx, state })
    }
}

impl<T> Worker<T> {
    /// Returns `true` when the worker is not running a job and has nothing
    /// queued.
    ///
    /// The worker sets `busy` before it decrements `pending`, so observing
    /// `pending == 0` also observes the flag raised by the receive that
    /// emptied the queue.
    pub(crate) fn is_idle(&self) -> bool {
        self.state.pending.load(Ordering::SeqCst) == 0 && !self.is_busy()
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.state.busy.load(Ordering::SeqCst)
    }

    /// Number of items sitting in the queue.
    pub(crate) fn queued(&self) -> usize {
        self.tx.len()
    }

    /// Enqueues without blocking.
    pub(crate) fn try_enqueue(&self, item: T) -> core::result::Result<(), TrySendError<T>> {
        self.state.pending.fetch_add(1, Ordering::SeqCst);
        self.tx.try_send(item).inspect_err(|_| {
            self.state.pending.fetch_sub(1, Ordering::SeqCst);
        })
    }

    /// Enqueues, blocking while the queue is full.
    pub(crate) fn enqueue(&self, item: T) -> core::result::Result<(), SendError<T>> {
        self.state.pending.fetch_add(1, Ordering::SeqCst);
        self.tx.send(item).inspect_err(|_| {
            self.state.pending.fetch_sub(1, Ordering::SeqCst);
        })
    }
}

/// Body of a worker thread.
///
/// Receives items until the queue disconnects, running `job` on each one with
/// the busy flag raised. A panic in `job` ends the thread with the flag still
/// set, which keeps the dispatcher's idle scan away from it.
///
/// Spawned once per worker by [`Worker::spawn`] and never restarted.
///
/// # Arguments
///
/// - `_worker_id`: Index of this worker in the pool (used for logs/tracing).
/// - `rx`: Receiving half of the worker's bounded queue. The loop ends once
///   every sender is dropped and the queue is drained.
/// - `state`: Flags shared with the dispatcher. The loop raises `busy` before
///   it decrements `pending`, and lowers `busy` after `job` returns.
/// - `job`: The pool-wide job, called synchronously once per received item.
pub(crate) fn worker_loop<T, F>(
    _worker_id: usize,
    rx: &Receiver<T>,
    state: &WorkerState,
    job: &F,
) where
    F: Fn(T) + ?Sized,
{
    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {_worker_id} started");

    while let Ok(item) = rx.recv() {
        state.busy.store(true, Ordering::SeqCst);
        state.pending.fetch_sub(1, Ordering::SeqCst);
        job(item);
        state.busy.store(false, Ordering::SeqCst);
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {_worker_id} stopped");
}
