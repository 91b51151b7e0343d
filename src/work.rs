use {
    log::debug,
    std::{
        thread,
        time::{Duration, Instant},
    },
};

/// A stand-in for real work: blocks the calling thread for a small, bounded amount of time.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Work {
    delay: Duration,
}

impl Work {
    /// Work that takes `delay` to perform.
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Work that completes immediately.
    pub const fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    /// How long a single unit of work blocks for.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Perform one unit of work.
    ///
    /// The delay is best effort. If the thread is woken early it logs the interruption and
    /// returns rather than parking again.
    pub fn perform(&self) {
        if self.delay.is_zero() {
            return;
        }

        let started = Instant::now();
        thread::park_timeout(self.delay);

        let slept = started.elapsed();
        if slept < self.delay {
            debug!(
                "work on {:?} interrupted after {:?} of {:?}",
                thread::current().name().unwrap_or("<unnamed>"),
                slept,
                self.delay
            );
        }
    }
}

impl Default for Work {
    fn default() -> Self {
        Self::new(Duration::from_millis(1))
    }
}

#[cfg(all(test, not(loom)))]
mod test {
    use super::*;

    #[test]
    fn no_work_returns_immediately() {
        let started = Instant::now();
        Work::none().perform();
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn work_blocks_for_at_most_a_bounded_time() {
        let work = Work::new(Duration::from_millis(2));

        let started = Instant::now();
        work.perform();

        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn an_interrupted_delay_does_not_fail_the_task() {
        let work = Work::new(Duration::from_secs(30));

        let worker = thread::spawn(move || {
            let started = Instant::now();
            work.perform();
            started.elapsed()
        });

        while !worker.is_finished() {
            worker.thread().unpark();
            thread::sleep(Duration::from_millis(1));
        }

        assert!(worker.join().unwrap() < Duration::from_secs(30));
    }
}
