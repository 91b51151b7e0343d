use {
    criterion::{criterion_group, criterion_main, BenchmarkId, Criterion},
    rw_bench::{BenchConfig, ReaderAccess, Trial, Work},
    std::{hint::black_box, time::Duration},
};

const TASK_COUNTS: &[usize] = &[10, 100];

fn trial(c: &mut Criterion) {
    let mut group = c.benchmark_group("trial");
    group.sample_size(10);

    for access in [ReaderAccess::Shared, ReaderAccess::Exclusive] {
        for &task_count in TASK_COUNTS {
            let config = BenchConfig {
                task_count,
                buffer_length: 20,
                work: Work::new(Duration::from_micros(50)),
                reader_access: access,
                ..Default::default()
            };
            let trial = Trial::new(&config);

            group.bench_with_input(
                BenchmarkId::new(format!("{access:?}"), task_count),
                &trial,
                |bencher, trial| bencher.iter(|| black_box(trial.run().unwrap())),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, trial);
criterion_main!(benches);
