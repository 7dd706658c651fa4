#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Evicts processor caches before a timed measurement, so that the measured operation starts
//! with a cold cache.
//!
//! A benchmark that calls the same cheap function in a tight loop measures the function with
//! its code and data already resident in the L1 cache. That is rarely what real callers
//! experience. This package provides a [`CacheWiper`] that walks a scratch buffer sized to
//! one or more cache levels, pushing whatever was cached before out of the way.
//!
//! # Cache levels and sizes
//!
//! The depth of eviction is selected with a [`CacheLevel`]. Each level maps to a byte size via
//! an immutable [`CacheSizes`] table. The sizes are cumulative: wiping [`CacheLevel::L1L2`]
//! walks a buffer as large as the L1 and L2 caches combined.
//!
//! Cache sizes differ between machines. The defaults describe one typical desktop processor;
//! use [`CacheSizes::detect()`] or supply your own values.
//!
//! # Wipe pass
//!
//! The wipe visits every `stride`-th 4-byte cell of the buffer (every 8th by default, one per
//! 32 bytes), XOR-accumulates a running hash and writes the hash back into the visited cell.
//! Every visited cache line is therefore both read and written. The hash is passed to
//! [`std::hint::black_box()`] so the compiler cannot discard the loop.
//!
//! # Example
//!
//! ```
//! use cache_wipe::{CacheLevel, CacheWiper, WipeConfig};
//!
//! let mut wiper = CacheWiper::new(WipeConfig::default());
//!
//! let wiped = wiper.wipe(CacheLevel::L1);
//! assert_eq!(wiped.stats().buffer_bytes(), 32 * 1024);
//! assert_eq!(wiped.stats().touched_cells(), 1024);
//!
//! // ... take the start timestamp, call the operation under test, take the stop timestamp ...
//!
//! // Release the buffer only after the measurement has been taken.
//! wiped.teardown();
//! ```
//!
//! # Failure
//!
//! Failing to allocate the wipe buffer is fatal: the wiper panics. A benchmark either completes
//! all of its iterations or aborts.

mod buffer;
mod config;
mod error;
mod level;
mod sizes;
mod wiper;

pub use buffer::*;
pub use config::*;
pub use error::*;
pub use level::*;
pub use sizes::*;
pub use wiper::*;
