use std::fmt::Debug;
use std::time::Instant;

/// A monotonic, high-resolution source of timestamps.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait TimeSource: Debug + Send {
    fn now(&mut self) -> Instant;
}
