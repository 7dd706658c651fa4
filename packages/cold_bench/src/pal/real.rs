use std::time::Instant;

use crate::pal::TimeSource;

/// Reads the monotonic clock via the Rust standard library.
#[derive(Clone, Debug, Default)]
pub(crate) struct RealTimeSource;

impl TimeSource for RealTimeSource {
    #[cfg_attr(test, mutants::skip)] // Real time cannot be meaningfully asserted on.
    fn now(&mut self) -> Instant {
        Instant::now()
    }
}
