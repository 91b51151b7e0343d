use {
    crate::{work::Work, Error, Result},
    std::time::Duration,
};

/// How reader tasks take the lock.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub enum ReaderAccess {
    /// Readers share the lock with each other.
    #[default]
    Shared,
    /// Readers take the lock exclusively, as a plain mutex would force them to.
    Exclusive,
}

/// Parameters of a benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    /// How many trials to run and aggregate.
    pub trial_count: usize,
    /// Tasks per trial: one writer, the rest readers.
    pub task_count: usize,
    /// Number of slots in the shared buffer.
    pub buffer_length: usize,
    /// Simulated work performed per slot by the writer and once by each reader.
    pub work: Work,
    /// Abort a trial that runs longer than this.
    pub trial_timeout: Option<Duration>,
    /// How reader tasks take the lock.
    pub reader_access: ReaderAccess,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            trial_count: 11,
            task_count: 1_000,
            buffer_length: 20,
            work: Work::default(),
            trial_timeout: None,
            reader_access: ReaderAccess::Shared,
        }
    }
}

impl BenchConfig {
    /// Reject parameters that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<()> {
        if self.trial_count == 0 {
            return Err(Error::Config("at least one trial is required".into()));
        }
        if self.task_count == 0 {
            return Err(Error::Config("at least one task, the writer, is required".into()));
        }
        if self.buffer_length == 0 {
            return Err(Error::Config("the shared buffer needs at least one slot".into()));
        }
        Ok(())
    }

    /// Number of reader tasks per trial.
    pub fn reader_count(&self) -> usize {
        self.task_count.saturating_sub(1)
    }
}
