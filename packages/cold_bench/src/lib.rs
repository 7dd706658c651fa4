#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Measures the call overhead of cheap operations, one call per timed window, optionally with
//! the processor caches evicted before every call.
//!
//! Most benchmark harnesses time a tight loop of many calls and divide. That hides how
//! expensive a single call is when its code and data are not already in the cache, which is
//! the common case for metadata accessors and constructors called once in a while. This package
//! times every call individually:
//!
//! - [`Trial`] - Configures a setup callback and a measured call, then executes them for a
//!   number of iterations under a [`TrialConfig`], producing a [`SampleSet`]
//! - [`Suite`] - A named table of trials, executed manually into a [`SuiteReport`] or
//!   registered with Criterion
//! - [`BaselineComparison`] - Subtracts the cost of timing an empty window from the cost of
//!   timing the call
//! - [`BenchConfig`] - Iteration count and wipe settings, loadable from a TOML file
//!
//! Cache eviction is provided by the [`cache_wipe`] package through the [`Evict`] trait.
//!
//! This package is not meant for use in production, serving only as a development tool for
//! benchmarking and performance analysis.
//!
//! # Operating Principles
//!
//! ## Iteration phases
//!
//! Every iteration performs, strictly in order: setup, cache eviction (unless the cache level is
//! `None`), start timestamp, the measured call (only if the workload is `Run`), stop timestamp,
//! recording the sample, releasing the wipe buffer and dropping the operand. Only the time
//! between the two timestamps is recorded.
//!
//! ## Baselines
//!
//! Each cache level is typically executed twice: once with [`Workload::Run`] and once with
//! [`Workload::Skip`], which times an empty window. The difference of the means isolates the
//! cost of the call from the cost of reading the clock.
//!
//! # Example
//!
//! ```
//! use cache_wipe::{CacheLevel, CacheWiper};
//! use cold_bench::{ParameterSet, Suite, Trial, Workload};
//!
//! let mut suite = Suite::new("strings")
//!     .parameters(ParameterSet::new([CacheLevel::None, CacheLevel::L1], Workload::ALL))
//!     .operation(
//!         "len",
//!         Trial::new()
//!             .setup(|_| String::from("hello"))
//!             .measure(|text| text.len()),
//!     );
//!
//! let report = suite.execute(&mut CacheWiper::default(), 100);
//!
//! for (level, comparison) in report.operations()[0].comparisons() {
//!     println!("{level}: {:?} per call", comparison.net());
//! }
//! ```

mod config;
mod error;
mod evict;
mod pal;
mod report;
mod samples;
mod suite;
mod suite_criterion;
mod trial;
mod trial_config;
mod trial_configured;
mod trial_configured_criterion;
mod trial_meta;

// This is in a separate module because 99% of the time the user never needs to name
// these types, so it makes sense to de-emphasize them in the API documentation.
pub mod configure;

pub use config::*;
pub use error::*;
pub use evict::*;
pub use report::*;
pub use samples::*;
pub use suite::*;
pub use trial::*;
pub use trial_config::*;
pub use trial_configured::*;
pub use trial_meta::*;
