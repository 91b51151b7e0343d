use {
    anyhow::Result,
    clap::Parser,
    env_logger::Env,
    rw_bench::{run_benchmark, BenchConfig, ReaderAccess, Work},
    std::time::Duration,
};

#[derive(Parser)]
#[clap(author, version)]
#[clap(name = "rw-bench")]
#[clap(about = "Times one writer racing many readers over a lock-guarded buffer.", long_about = None)]
struct Cli {
    /// Number of trials to aggregate.
    #[clap(long, env = "RW_BENCH_TRIALS", default_value_t = 11)]
    trials: usize,

    /// Tasks per trial, one writer and the rest readers.
    #[clap(long, env = "RW_BENCH_TASKS", default_value_t = 1_000)]
    tasks: usize,

    /// Slots in the shared buffer.
    #[clap(long, env = "RW_BENCH_BUFFER_LENGTH", default_value_t = 20)]
    buffer_length: usize,

    /// Simulated work per step, in microseconds.
    #[clap(long, env = "RW_BENCH_WORK_DELAY_US", default_value_t = 1_000)]
    work_delay_us: u64,

    /// Treat a trial running longer than this many milliseconds as deadlocked.
    #[clap(long, env = "RW_BENCH_TRIAL_TIMEOUT_MS")]
    trial_timeout_ms: Option<u64>,

    /// Make readers take the lock exclusively, for comparison with shared reads.
    #[clap(long, env = "RW_BENCH_EXCLUSIVE_READERS")]
    exclusive_readers: bool,
}

impl From<Cli> for BenchConfig {
    fn from(cli: Cli) -> Self {
        Self {
            trial_count: cli.trials,
            task_count: cli.tasks,
            buffer_length: cli.buffer_length,
            work: Work::new(Duration::from_micros(cli.work_delay_us)),
            trial_timeout: cli.trial_timeout_ms.map(Duration::from_millis),
            reader_access: if cli.exclusive_readers {
                ReaderAccess::Exclusive
            } else {
                ReaderAccess::Shared
            },
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = BenchConfig::from(Cli::parse());
    let summary = run_benchmark(&config)?;

    println!(
        "Median time in nanoseconds: {}",
        group_thousands(&summary.median_nanos().to_string())
    );
    println!(
        "Average time in nanoseconds: {}",
        group_thousands(&format!("{:.2}", summary.mean_nanos))
    );

    Ok(())
}

/// Insert a comma between every group of three integer digits.
fn group_thousands(number: &str) -> String {
    let (integer, fraction) = match number.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (number, None),
    };

    let mut grouped = String::with_capacity(number.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index != 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    grouped
}
