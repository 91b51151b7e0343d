use {
    crate::{
        config::{BenchConfig, ReaderAccess},
        task::{self, Ones, SumConsistency, WorkConsumer, WorkProducer},
        work::Work,
        Error, Occupancy, Result, SharedBuffer,
    },
    crossbeam_channel::{Receiver, RecvTimeoutError, Sender},
    log::{debug, warn},
    std::{
        sync::Arc,
        thread::{self, JoinHandle},
        time::{Duration, Instant},
    },
};

const BUFFER_NAME: &str = "shared";

const TASK_STACK_SIZE: usize = 256 * 1024;

/// One writer racing many readers over a freshly initialized buffer.
#[derive(Debug, Clone)]
pub struct Trial<P = Ones, C = SumConsistency> {
    task_count: usize,
    buffer_length: usize,
    work: Work,
    reader_access: ReaderAccess,
    timeout: Option<Duration>,
    producer: Arc<P>,
    consumer: Arc<C>,
}

/// What a completed trial measured and observed.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialOutcome {
    /// Wall-clock time from spawning the first task until every task was joined.
    pub elapsed: Duration,
    /// How the lock was held during the trial.
    pub occupancy: Occupancy,
    /// Reads that saw the buffer before the writer had touched it.
    pub untouched_reads: usize,
    /// Reads that saw the buffer after the writer had filled it.
    pub written_reads: usize,
}

#[derive(Debug, Copy, Clone)]
enum Role {
    Writer,
    Reader,
}

#[derive(Debug, Copy, Clone)]
enum Report {
    Wrote,
    Read(i64),
}

impl Trial {
    /// A trial shaped by `config`. The trial count is the aggregator's concern and is ignored.
    pub fn new(config: &BenchConfig) -> Self {
        Self::with_tasks(config, Ones, SumConsistency)
    }
}

impl<P, C> Trial<P, C>
where
    P: WorkProducer + Send + Sync + 'static,
    C: WorkConsumer + Send + Sync + 'static,
{
    /// A trial whose writer stores `producer`'s values and whose readers validate with `consumer`.
    pub(crate) fn with_tasks(config: &BenchConfig, producer: P, consumer: C) -> Self {
        Self {
            task_count: config.task_count,
            buffer_length: config.buffer_length,
            work: config.work,
            reader_access: config.reader_access,
            timeout: config.trial_timeout,
            producer: Arc::new(producer),
            consumer: Arc::new(consumer),
        }
    }

    /// Run every task to completion and time it.
    ///
    /// The first task error aborts the trial. Tasks still running at that point are detached
    /// and left to finish on their own.
    pub fn run(&self) -> Result<TrialOutcome> {
        let mut buffer = SharedBuffer::new(BUFFER_NAME);
        buffer.initialize(self.buffer_length);
        let buffer = Arc::new(buffer);

        let started = Instant::now();
        let deadline = self.timeout.map(|timeout| started + timeout);

        let (reports, received) = crossbeam_channel::unbounded();
        let tasks = self.spawn_all(&buffer, reports)?;

        let mut outcome = TrialOutcome {
            elapsed: Duration::ZERO,
            occupancy: Occupancy::default(),
            untouched_reads: 0,
            written_reads: 0,
        };

        for _ in 0..tasks.len() {
            let Some(report) = self.receive(&received, deadline)? else {
                // A task hung up without reporting, joining below tells us which.
                break;
            };

            if let Report::Read(sum) = report? {
                if sum == 0 {
                    outcome.untouched_reads += 1;
                } else {
                    outcome.written_reads += 1;
                }
            }
        }

        for task in tasks {
            let name = task.thread().name().unwrap_or("<unnamed>").to_owned();
            task.join().map_err(|_| Error::TaskPanicked(name))?;
        }

        outcome.elapsed = started.elapsed();
        outcome.occupancy = buffer.occupancy();

        let sum = buffer.shared()?.iter().sum::<i64>();
        if sum != self.buffer_length as i64 {
            return Err(Error::InvariantViolation {
                sum,
                len: self.buffer_length,
            });
        }

        if outcome.occupancy.overlaps != 0 {
            warn!(
                "lock admitted {} overlapping holders",
                outcome.occupancy.overlaps
            );
        }

        debug!(
            "trial of {} tasks took {:?}: {} reads before the write, {} after, peak of {} readers",
            self.task_count,
            outcome.elapsed,
            outcome.untouched_reads,
            outcome.written_reads,
            outcome.occupancy.peak_readers
        );

        Ok(outcome)
    }

    fn spawn_all(
        &self,
        buffer: &Arc<SharedBuffer>,
        reports: Sender<Result<Report>>,
    ) -> Result<Vec<JoinHandle<()>>> {
        let mut tasks = Vec::with_capacity(self.task_count);

        tasks.push(self.spawn("writer".to_owned(), Role::Writer, buffer, &reports)?);
        for index in 1..self.task_count {
            tasks.push(self.spawn(format!("reader-{index}"), Role::Reader, buffer, &reports)?);
        }

        Ok(tasks)
    }

    fn spawn(
        &self,
        name: String,
        role: Role,
        buffer: &Arc<SharedBuffer>,
        reports: &Sender<Result<Report>>,
    ) -> Result<JoinHandle<()>> {
        let buffer = Arc::clone(buffer);
        let reports = reports.clone();
        let producer = Arc::clone(&self.producer);
        let consumer = Arc::clone(&self.consumer);
        let work = self.work;
        let access = self.reader_access;

        let task = thread::Builder::new()
            .name(name)
            .stack_size(TASK_STACK_SIZE)
            .spawn(move || {
                let report = match role {
                    Role::Writer => task::write(&buffer, &work, &*producer).map(|()| Report::Wrote),
                    Role::Reader => {
                        task::read(&buffer, access, &work, &*consumer).map(Report::Read)
                    }
                };

                // The orchestrator only hangs up after it has given up on the trial.
                let _ = reports.send(report);
            })?;

        Ok(task)
    }

    fn receive(
        &self,
        received: &Receiver<Result<Report>>,
        deadline: Option<Instant>,
    ) -> Result<Option<Result<Report>>> {
        let report = match deadline {
            Some(deadline) => received.recv_deadline(deadline),
            None => received.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match report {
            Ok(report) => Ok(Some(report)),
            Err(RecvTimeoutError::Disconnected) => Ok(None),
            Err(RecvTimeoutError::Timeout) => {
                Err(Error::TrialTimeout(self.timeout.unwrap_or_default()))
            }
        }
    }
}
