//! Measures the call overhead of tensor metadata operations and prints a baseline-subtracted
//! report.
//!
//! # Usage
//!
//! ```text
//! overheads [--config <PATH>] [--iterations <N>] [--filter <SUBSTRING>] [--level <LEVEL>...]
//!           [--reuse-buffer] [--detect-caches]
//! ```
//!
//! Every operation is measured under each requested cache level (`none`, `l1`, `l1+l2`,
//! `l1+l2+l3`; by default `none` and `l1`), once with the call and once without it. The report
//! is printed to standard output. Diagnostics go to standard error and are controlled with
//! `RUST_LOG` (default `warn`).

use std::error::Error as _;
use std::num::NonZero;
use std::path::PathBuf;
use std::process::ExitCode;

use argh::FromArgs;
use benchmarks::{Overrides, parameters, tensor_suite};
use cache_wipe::{CacheLevel, CacheWiper};
use cold_bench::BenchConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Measures the call overhead of tensor metadata operations under warm and cold caches.
#[derive(FromArgs)]
struct Args {
    /// path to a TOML configuration file
    #[argh(option)]
    config: Option<PathBuf>,

    /// iterations per configuration, overriding the configuration file
    #[argh(option)]
    iterations: Option<NonZero<u64>>,

    /// only measure operations whose name contains this substring
    #[argh(option)]
    filter: Option<String>,

    /// cache level to measure under, may be repeated (none, l1, l1+l2, l1+l2+l3)
    #[argh(option)]
    level: Vec<CacheLevel>,

    /// keep one wipe buffer across iterations instead of allocating one per iteration
    #[argh(switch)]
    reuse_buffer: bool,

    /// size the wipe buffers after the caches of this machine
    #[argh(switch)]
    detect_caches: bool,
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");

            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }

            return ExitCode::FAILURE;
        }
    };

    tracing::info!(?config, "starting measurement");

    let mut suite = tensor_suite(parameters(&args.level));

    if let Some(filter) = &args.filter {
        suite = suite.filter(filter.as_str());
    }

    if suite.operation_names().next().is_none() {
        eprintln!("No operations match the filter.");
        return ExitCode::FAILURE;
    }

    let mut wiper = CacheWiper::new(*config.wipe());

    let report = suite.execute(&mut wiper, config.iterations().get());

    println!("{report}");

    ExitCode::SUCCESS
}

fn load_config(args: &Args) -> Result<BenchConfig, cold_bench::Error> {
    let config = match &args.config {
        Some(path) => BenchConfig::from_file(path)?,
        None => BenchConfig::default(),
    };

    let overrides = Overrides {
        iterations: args.iterations,
        reuse_buffer: args.reuse_buffer,
        detect_caches: args.detect_caches,
    };

    Ok(overrides.apply(config))
}
