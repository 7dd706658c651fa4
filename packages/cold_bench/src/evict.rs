use cache_wipe::{CacheLevel, CacheWiper, Wiped};

/// Evicts processor caches before the timed window of a trial opens.
///
/// [`CacheWiper`] is the real implementation. The trait exists so that the trial runner can
/// be exercised with substitutes that record what happens when.
pub trait Evict {
    /// Whatever must be kept alive until the measurement is over, such as the wipe buffer.
    type Guard;

    /// Evicts the caches down to `level`. Never called with [`CacheLevel::None`].
    fn evict(&mut self, level: CacheLevel) -> Self::Guard;

    /// Releases whatever [`evict()`](Self::evict) returned. Called after the stop timestamp.
    fn release(&mut self, guard: Self::Guard);
}

impl Evict for CacheWiper {
    type Guard = Wiped;

    fn evict(&mut self, level: CacheLevel) -> Wiped {
        self.wipe(level)
    }

    fn release(&mut self, guard: Wiped) {
        guard.teardown();
    }
}
