#![warn(missing_docs)]

//! Measure how a reader-writer lock behaves when one writer races many readers over a shared
//! buffer.

/// The shared buffer and its instrumented reader-writer lock.
pub mod buffer;

/// Benchmark parameters.
pub mod config;

/// Median and mean over repeated trials.
pub mod stats;

/// Writer and reader tasks.
pub mod task;

/// Spawning, joining and timing one trial.
pub mod trial;

/// Simulated work.
pub mod work;

mod error;
mod sync;

pub use {
    buffer::{ExclusiveAccess, Occupancy, SharedAccess, SharedBuffer},
    config::{BenchConfig, ReaderAccess},
    error::{Error, Result},
    stats::{run_benchmark, run_trials, Summary},
    trial::{Trial, TrialOutcome},
    work::Work,
};
