use crate::{Error, Result};

/// Default prefix for worker thread names.
pub const DEFAULT_THREAD_NAME: &str = "eager-worker";

/// Construction parameters for an [`crate::EagerPool`].
///
/// Worker threads are named `{thread_name}-{index}`, which makes them easy to
/// tell apart in logs and from inside the job via
/// [`std::thread::current`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of worker threads. Must be at least 1.
    pub num_workers: usize,
    /// Capacity of each worker's bounded queue. Must be at least 1.
    pub queue_capacity: usize,
    /// Prefix used when naming worker threads.
    pub thread_name: String,
}

impl PoolConfig {
    pub fn new(num_workers: usize, queue_capacity: usize) -> Self {
        Self {
            num_workers,
            queue_capacity,
            thread_name: DEFAULT_THREAD_NAME.to_owned(),
        }
    }

    #[must_use]
    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }

    /// Checks the numeric constraints.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `num_workers` or `queue_capacity`
    /// is zero.
    pub fn validate(&self) -> Result<()> {
        if self.num_workers < 1 {
            return Err(Error::invalid_config("number of workers must be >= 1"));
        }
        if self.queue_capacity < 1 {
            return Err(Error::invalid_config("queue capacity must be >= 1"));
        }
        Ok(())
    }
}
