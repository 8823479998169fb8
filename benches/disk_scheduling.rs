//! Benchmarks for disk-head scheduling

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use osalgo_rs::{schedule_disk, Direction, DiskPolicy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DISK_SIZE: u64 = 10_000;

fn benchmark_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("disk_schedule");
    let mut rng = StdRng::seed_from_u64(42);

    for size in [100usize, 1000].iter() {
        let requests: Vec<u64> = (0..*size).map(|_| rng.gen_range(0..DISK_SIZE)).collect();
        for policy in [
            DiskPolicy::Fcfs,
            DiskPolicy::Sstf,
            DiskPolicy::Scan,
            DiskPolicy::CScan,
            DiskPolicy::Look,
            DiskPolicy::CLook,
        ] {
            group.bench_with_input(
                BenchmarkId::new(policy.as_str(), size),
                &requests,
                |b, requests| {
                    b.iter(|| {
                        schedule_disk(
                            black_box(requests),
                            DISK_SIZE / 2,
                            policy,
                            Some(DISK_SIZE),
                            Direction::Up,
                        )
                        .unwrap()
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_policies);
criterion_main!(benches);
