//! Measures a cheap accessor with a warm cache and with the L1 cache evicted before every call,
//! then prints how much each call costs once the cost of timing an empty window is subtracted.

#![allow(missing_docs, reason = "No need for API documentation in example code")]

use cache_wipe::{BufferPolicy, CacheLevel, CacheWiper, WipeConfig};
use cold_bench::{ParameterSet, Suite, Trial, Workload};

const ITERATIONS: u64 = 10_000;

fn main() {
    println!("cold_bench Cold Cache Accessor Example");
    println!("======================================");
    println!();

    let mut suite = Suite::new("accessors")
        .parameters(ParameterSet::new(
            [CacheLevel::None, CacheLevel::L1],
            Workload::ALL,
        ))
        .operation(
            "vec_len",
            Trial::new()
                .setup(|_| vec![0_u8; 64])
                .measure(|bytes| bytes.len()),
        )
        .operation(
            "string_is_empty",
            Trial::new()
                .setup(|_| String::from("cold"))
                .measure(|text| text.is_empty()),
        );

    let mut wiper = CacheWiper::new(
        WipeConfig::builder()
            .policy(BufferPolicy::Reused)
            .build(),
    );

    println!("Running {ITERATIONS} iterations per configuration");
    println!();

    let report = suite.execute(&mut wiper, ITERATIONS);

    println!("{report}");

    for operation in report.operations() {
        for (level, comparison) in operation.comparisons() {
            println!(
                "{} under {level}: {:?} per call",
                operation.name(),
                comparison.net()
            );
        }
    }
}
