use {std::time::Duration, thiserror::Error};

/// Errors that abort a trial or a benchmark run.
///
/// None of these are retried: an invariant or lookup failure means the locking discipline or the
/// harness ordering is broken, and the statistics of that run would be meaningless.
#[derive(Debug, Error)]
pub enum Error {
    /// A reader observed a buffer that was neither untouched nor fully written.
    #[error("reader observed a partially written buffer: sum {sum} is neither 0 nor {len}")]
    InvariantViolation {
        /// The sum seen by the reader.
        sum: i64,
        /// The buffer length, which is also the sum of a fully written buffer.
        len: usize,
    },

    /// A task reached the shared buffer before it was initialized.
    #[error("shared buffer `{name}` has not been initialized")]
    Lookup {
        /// Name of the buffer that was looked up.
        name: String,
    },

    /// The trial did not finish within its deadline, most likely a deadlock.
    #[error("trial did not complete within {0:?}")]
    TrialTimeout(Duration),

    /// A task thread panicked instead of reporting a result.
    #[error("task `{0}` panicked")]
    TaskPanicked(String),

    /// The OS refused to spawn a task thread.
    #[error("failed to spawn task thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// The benchmark parameters cannot produce a meaningful run.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
