//! Fixed-size pool of eager workers.
//!
//! This module defines [`EagerPool`], which owns a set of worker threads, each
//! fed by its own bounded queue. Submitted items go to the first idle worker
//! in index order. When every worker is busy the pool enters *unbalanced
//! mode* and buffers the item into the worker under a round-robin cursor,
//! blocking the caller if that worker's queue is full.
//!
//! All dispatch decisions are made under a single lock, so two concurrent
//! submitters can never both see the same worker idle and hand it two items.

use crate::{
    Result,
    config::PoolConfig,
    worker::{Job, Worker},
};
use core::fmt;
use crossbeam_channel::TrySendError;
use parking_lot::Mutex;
use std::sync::Arc;


/// Which branch of the dispatch algorithm routed an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(test), allow(dead_code))]
pub(crate) enum Dispatch {
    /// The item went to an idle worker found by the index-order scan.
    Idle { worker: usize },
    /// No worker was idle; the item was buffered into the worker under the
    /// round-robin cursor.
    Unbalanced { worker: usize },
}

/// A fixed-size pool of worker threads that prefers idle workers.
///
/// The pool is `Sync`: share it behind an [`Arc`] and call
/// [`submit`](Self::submit) from as many threads as needed. Worker threads
/// live until the pool is dropped, at which point each one drains its queue
/// and exits. There is no way to cancel a running job.
pub struct EagerPool<T> {
    workers: Vec<Worker<T>>,
    /// Next worker to receive an item in unbalanced mode. The mutex is also
    /// the dispatch lock.
    cursor: Mutex<usize>,
}

impl<T: Send + 'static> EagerPool<T> {
    /// Builds a pool of `num_workers` threads, each with a queue holding up to
    /// `queue_capacity` items, all running `job`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfig`] if either number is zero, and
    /// [`crate::Error::Spawn`] if a worker thread cannot be started.
    pub fn new<F>(num_workers: usize, queue_capacity: usize, job: F) -> Result<Self>
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self::from_config(PoolConfig::new(num_workers, queue_capacity), job)
    }

    /// Builds a pool from a [`PoolConfig`].
    ///
    /// The configuration is validated before any thread is spawned.
    ///
    /// # Errors
    ///
    /// See [`EagerPool::new`].
    pub fn from_config<F>(config: PoolConfig, job: F) -> Result<Self>
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        config.validate()?;

        let job: Job<T> = Arc::new(job);
        let workers = (0..config.num_workers)
            .map(|worker_id| {
                Worker::spawn(
                    worker_id,
                    config.queue_capacity,
                    &config.thread_name,
                    Arc::clone(&job),
                )
            })
            .collect::<Result<Vec<_>>>()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Started {} workers with queue capacity {}",
            config.num_workers,
            config.queue_capacity
        );

        Ok(Self {
            workers,
            cursor: Mutex::new(0),
        })
    }
}

impl<T> EagerPool<T> {
    /// Submits an item for processing.
    ///
    /// Never fails. Blocks only when every worker is busy and the queue of
    /// the worker under the round-robin cursor is full.
    pub fn submit(&self, item: T) {
        let _ = self.dispatch(item);
    }

    /// Routes `item` to a worker and reports the branch taken.
    pub(crate) fn dispatch(&self, item: T) -> Dispatch {
        let mut cursor = self.cursor.lock();

        let mut item = item;
        for (idx, worker) in self.workers.iter().enumerate() {
            if !worker.is_idle() {
                continue;
            }
            match worker.try_enqueue(item) {
                Ok(()) => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!("Worker {idx} is idle, dispatching");
                    return Dispatch::Idle { worker: idx };
                }
                // Lost the race against a worker that died or filled up
                // between the check and the send; keep scanning.
                Err(TrySendError::Full(returned) | TrySendError::Disconnected(returned)) => {
                    item = returned;
                }
            }
        }

        let idx = *cursor;
        #[cfg(feature = "tracing")]
        tracing::debug!("All workers are busy, using unbalanced mode on worker {idx}");

        if let Err(_e) = self.workers[idx].enqueue(item) {
            #[cfg(feature = "tracing")]
            tracing::error!("Worker {idx} queue is disconnected, dropping item: {_e}");
        }
        *cursor = (idx + 1) % self.workers.len();

        Dispatch::Unbalanced { worker: idx }
    }

    /// Number of workers in the pool.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Always `false`; a pool has at least one worker.
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Worker that receives the next item in unbalanced mode.
    ///
    /// Takes the dispatch lock, so this waits for any in-progress submit.
    pub fn cursor(&self) -> usize {
        *self.cursor.lock()
    }

    /// Whether `worker` is currently running a job, or `None` if out of range.
    ///
    /// This is a snapshot and may be stale by the time it is read.
    pub fn is_busy(&self, worker: usize) -> Option<bool> {
        self.workers.get(worker).map(Worker::is_busy)
    }

    /// Whether `worker` has no running job and nothing queued, or `None` if
    /// out of range.
    pub fn is_idle(&self, worker: usize) -> Option<bool> {
        self.workers.get(worker).map(Worker::is_idle)
    }

    /// Number of workers currently running a job.
    pub fn busy_count(&self) -> usize {
        self.workers.iter().filter(|w| w.is_busy()).count()
    }

    /// Number of items waiting in `worker`'s queue, or `None` if out of range.
    pub fn queued(&self, worker: usize) -> Option<usize> {
        self.workers.get(worker).map(Worker::queued)
    }
}

impl<T> fmt::Debug for EagerPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EagerPool")
            .field("workers", &self.workers.len())
            .field("busy", &self.busy_count())
            .field("cursor", &self.cursor.try_lock().map(|c| *c))
            .finish()
    }
}
