//! Measures the cost of wiping the cache itself, for every cache level and buffer policy.
//!
//! This is the overhead that a cold-cache benchmark pays outside its timed window.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;

use cache_wipe::{BufferPolicy, CacheLevel, CacheWiper, WipeConfig};
use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("wipe_cache");

    for level in CacheLevel::EVICTING {
        // A hoisted buffer, walked again on every iteration.
        group.bench_with_input(
            BenchmarkId::new("reused", level),
            &level,
            |b, &level| {
                let mut wiper =
                    CacheWiper::new(WipeConfig::builder().policy(BufferPolicy::Reused).build());

                b.iter(|| black_box(wiper.wipe(level).stats().hash()));
            },
        );

        // A fresh buffer for every iteration. Allocation is part of what is measured here,
        // release of the buffer is not.
        group.bench_with_input(
            BenchmarkId::new("per_trial", level),
            &level,
            |b, &level| {
                let mut wiper = CacheWiper::new(WipeConfig::default());

                b.iter_batched(
                    || (),
                    |()| wiper.wipe(level),
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}
