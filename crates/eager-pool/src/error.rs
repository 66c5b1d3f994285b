//! Error types for pool construction.
//!
//! Every failure the pool can report happens while it is being built. Once an
//! [`crate::EagerPool`] exists, submitting work never fails: saturation shows
//! up as the caller blocking, not as an error.
//!
//! ## Error Cases
//! - `InvalidConfig`: the worker count or queue capacity is out of range.
//! - `Spawn`: the operating system refused to start a worker thread.

pub type Result<T> = core::result::Result<T, Error>;

/// All errors that `eager-pool` can produce.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The supplied configuration violates a construction constraint.
    ///
    /// No worker thread has been started when this is returned.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A worker thread could not be spawned.
    ///
    /// Workers started before the failure observe their queue disconnect and
    /// exit on their own; no partially built pool is handed back.
    #[error("Failed to spawn worker {worker}: {source}")]
    Spawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}
