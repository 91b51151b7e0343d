use {
    crate::{config::BenchConfig, trial::Trial, Error, Result},
    log::{debug, error, info},
    std::time::Duration,
};

/// Median and mean of a set of trial durations.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// The middle duration once sorted. For an even count this is the upper of the two middles.
    pub median: Duration,
    /// Arithmetic mean in nanoseconds.
    pub mean_nanos: f64,
    /// Sorted durations the summary was computed from.
    pub durations: Vec<Duration>,
}

impl Summary {
    /// Summarize `durations`, which need not be sorted.
    pub fn from_durations(mut durations: Vec<Duration>) -> Result<Self> {
        if durations.is_empty() {
            return Err(Error::Config("cannot summarize zero trials".into()));
        }

        durations.sort_unstable();

        let median = durations[durations.len() / 2];
        let total: u128 = durations.iter().map(Duration::as_nanos).sum();
        let mean_nanos = total as f64 / durations.len() as f64;

        Ok(Self {
            median,
            mean_nanos,
            durations,
        })
    }

    /// The median in whole nanoseconds.
    pub fn median_nanos(&self) -> u128 {
        self.median.as_nanos()
    }
}

/// Run `trial_count` trials one after another and summarize their durations.
///
/// The first failing trial aborts the run; its error is returned as is.
pub fn run_trials(
    trial_count: usize,
    mut trial: impl FnMut(usize) -> Result<Duration>,
) -> Result<Summary> {
    let mut durations = Vec::with_capacity(trial_count);

    for index in 0..trial_count {
        match trial(index) {
            Ok(elapsed) => {
                debug!("trial {index} finished in {elapsed:?}");
                durations.push(elapsed);
            }
            Err(err) => {
                error!("trial {index} aborted: {err}");
                return Err(err);
            }
        }
    }

    Summary::from_durations(durations)
}

/// Run the whole benchmark described by `config`.
pub fn run_benchmark(config: &BenchConfig) -> Result<Summary> {
    config.validate()?;

    info!(
        "running {} trials of 1 writer and {} readers over {} slots ({:?} readers, {:?} of work)",
        config.trial_count,
        config.reader_count(),
        config.buffer_length,
        config.reader_access,
        config.work.delay()
    );

    let trial = Trial::new(config);
    let summary = run_trials(config.trial_count, |_| Ok(trial.run()?.elapsed))?;

    info!(
        "median {:?}, mean {:.2}ns",
        summary.median, summary.mean_nanos
    );

    Ok(summary)
}

#[cfg(all(test, not(loom)))]
mod test {
    use {super::*, crate::work::Work};

    fn nanos(values: &[u64]) -> Vec<Duration> {
        values.iter().copied().map(Duration::from_nanos).collect()
    }

    #[test]
    fn the_median_and_mean_of_eleven_trials() {
        let summary = Summary::from_durations(nanos(&[5, 1, 9, 3, 7, 2, 8, 4, 6, 10, 11])).unwrap();

        assert_eq!(summary.median_nanos(), 6);
        assert_eq!(format!("{:.2}", summary.mean_nanos), "6.00");
        assert_eq!(summary.durations, nanos(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]));
    }

    #[test]
    fn an_even_count_takes_the_upper_middle() {
        let summary = Summary::from_durations(nanos(&[40, 10, 30, 20])).unwrap();

        assert_eq!(summary.median_nanos(), 30);
        assert_eq!(summary.mean_nanos, 25.0);
    }

    #[test]
    fn summarizing_nothing_is_an_error() {
        assert!(matches!(
            Summary::from_durations(Vec::new()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn trials_run_in_order_exactly_the_requested_number_of_times() {
        let synthetic = nanos(&[5, 1, 9, 3, 7, 2, 8, 4, 6, 10, 11]);
        let mut seen = Vec::new();

        let summary = run_trials(synthetic.len(), |index| {
            seen.push(index);
            Ok(synthetic[index])
        })
        .unwrap();

        assert_eq!(seen, (0..11).collect::<Vec<_>>());
        assert_eq!(summary.median, Duration::from_nanos(6));
        assert_eq!(summary.mean_nanos, 6.0);
    }

    #[test]
    fn a_failing_trial_aborts_the_run() {
        let mut calls = 0;

        let result = run_trials(5, |index| {
            calls += 1;
            if index == 2 {
                Err(Error::InvariantViolation { sum: 3, len: 20 })
            } else {
                Ok(Duration::from_nanos(1))
            }
        });

        assert!(matches!(
            result,
            Err(Error::InvariantViolation { sum: 3, len: 20 })
        ));
        assert_eq!(calls, 3);
    }

    #[test]
    fn a_small_benchmark_reports_every_trial() {
        let config = BenchConfig {
            trial_count: 3,
            task_count: 10,
            buffer_length: 4,
            work: Work::none(),
            ..Default::default()
        };

        let summary = run_benchmark(&config).unwrap();

        assert_eq!(summary.durations.len(), 3);
        assert!(summary.durations.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn an_invalid_configuration_runs_no_trials() {
        let config = BenchConfig {
            trial_count: 0,
            ..Default::default()
        };

        assert!(matches!(run_benchmark(&config), Err(Error::Config(_))));
    }
}
