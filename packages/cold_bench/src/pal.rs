//! Platform abstraction layer for the clock used to timestamp trials.
//!
//! The real implementation reads the monotonic clock of the operating system. Tests replace it
//! with a mock to control the timestamps and observe when they are taken.

mod abstractions;
mod facade;
mod real;

pub(crate) use abstractions::*;
pub(crate) use facade::*;
pub(crate) use real::*;
