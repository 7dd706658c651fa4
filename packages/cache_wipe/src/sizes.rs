use std::mem;

use crate::{CacheLevel, Error, Result};

const KIB: usize = 1024;

/// Maps every [`CacheLevel`] to the number of bytes that must be walked to evict it.
///
/// The sizes are cumulative, so `l1_l2` is the combined size of the L1 and L2 caches. They must
/// be non-decreasing and each must be a whole number of 4-byte cells.
///
/// The default table describes a typical desktop processor (32 KiB L1 data cache, 256 KiB L2,
/// 8192 KiB L3). These values are platform-specific; prefer
/// [`detect()`](Self::detect) or explicit values measured on the target machine.
///
/// # Examples
///
/// ```
/// use cache_wipe::{CacheLevel, CacheSizes};
///
/// let sizes = CacheSizes::new(48 * 1024, 1328 * 1024, 33_096 * 1024).unwrap();
///
/// assert_eq!(sizes.bytes(CacheLevel::None), 0);
/// assert_eq!(sizes.bytes(CacheLevel::L1), 48 * 1024);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CacheSizes {
    l1: usize,
    l1_l2: usize,
    l1_l2_l3: usize,
}

impl CacheSizes {
    /// The sizes observed on the reference machine: 32 KiB, 288 KiB and 8480 KiB.
    pub const OBSERVED: Self = Self {
        l1: 32 * KIB,
        l1_l2: 288 * KIB,
        l1_l2_l3: 8480 * KIB,
    };

    /// Creates a size table from cumulative byte counts.
    ///
    /// # Errors
    ///
    /// Returns an error if any size is zero or not a multiple of 4 bytes, or if the sizes
    /// decrease from one level to the next.
    pub fn new(l1: usize, l1_l2: usize, l1_l2_l3: usize) -> Result<Self> {
        let invalid = |problem: &str| Error::InvalidCacheSizes {
            l1,
            l1_l2,
            l1_l2_l3,
            problem: problem.to_string(),
        };

        if l1 == 0 {
            return Err(invalid("the L1 size must be greater than zero"));
        }

        if l1 > l1_l2 || l1_l2 > l1_l2_l3 {
            return Err(invalid(
                "sizes are cumulative and must not decrease from one level to the next",
            ));
        }

        if [l1, l1_l2, l1_l2_l3]
            .iter()
            .any(|size| size % mem::size_of::<u32>() != 0)
        {
            return Err(invalid("every size must be a multiple of 4 bytes"));
        }

        Ok(Self {
            l1,
            l1_l2,
            l1_l2_l3,
        })
    }

    /// Builds a size table from the cache hierarchy reported by the current processor.
    ///
    /// Any level the platform does not report falls back to the per-level size of
    /// [`OBSERVED`](Self::OBSERVED).
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Depends on the hardware we happen to run on.
    pub fn detect() -> Self {
        let l1 = cache_size::l1_cache_size().unwrap_or(32 * KIB);
        let l2 = cache_size::l2_cache_size().unwrap_or(256 * KIB);
        let l3 = cache_size::l3_cache_size().unwrap_or(8192 * KIB);

        tracing::debug!(l1, l2, l3, "detected processor cache sizes");

        Self::from_per_level(l1, l2, l3)
    }

    fn from_per_level(l1: usize, l2: usize, l3: usize) -> Self {
        let l1 = round_to_cells(l1).max(mem::size_of::<u32>());
        let l1_l2 = l1.saturating_add(round_to_cells(l2));
        let l1_l2_l3 = l1_l2.saturating_add(round_to_cells(l3));

        Self {
            l1,
            l1_l2,
            l1_l2_l3,
        }
    }

    /// The number of bytes to walk in order to evict `level`.
    #[must_use]
    pub fn bytes(&self, level: CacheLevel) -> usize {
        match level {
            CacheLevel::None => 0,
            CacheLevel::L1 => self.l1,
            CacheLevel::L1L2 => self.l1_l2,
            CacheLevel::L1L2L3 => self.l1_l2_l3,
        }
    }
}

impl Default for CacheSizes {
    fn default() -> Self {
        Self::OBSERVED
    }
}

fn round_to_cells(bytes: usize) -> usize {
    bytes
        .checked_div(mem::size_of::<u32>())
        .and_then(|cells| cells.checked_mul(mem::size_of::<u32>()))
        .expect("cell size is a non-zero constant and rounding down cannot overflow")
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn observed_sizes() {
        let sizes = CacheSizes::default();

        assert_eq!(sizes.bytes(CacheLevel::None), 0);
        assert_eq!(sizes.bytes(CacheLevel::L1), 32_768);
        assert_eq!(sizes.bytes(CacheLevel::L1L2), 294_912);
        assert_eq!(sizes.bytes(CacheLevel::L1L2L3), 8_683_520);
    }

    #[test]
    fn accepts_equal_levels() {
        let sizes = CacheSizes::new(64, 64, 64).unwrap();
        assert_eq!(sizes.bytes(CacheLevel::L1L2L3), 64);
    }

    #[test]
    fn rejects_zero_l1() {
        assert!(CacheSizes::new(0, 64, 128).is_err());
    }

    #[test]
    fn rejects_decreasing_sizes() {
        assert!(CacheSizes::new(128, 64, 256).is_err());
        assert!(CacheSizes::new(64, 256, 128).is_err());
    }

    #[test]
    fn rejects_partial_cells() {
        assert!(CacheSizes::new(30, 64, 128).is_err());
        assert!(CacheSizes::new(32, 66, 128).is_err());
        assert!(CacheSizes::new(32, 64, 127).is_err());
    }

    #[test]
    fn per_level_sizes_accumulate() {
        let sizes = CacheSizes::from_per_level(32 * KIB, 256 * KIB, 8192 * KIB);
        assert_eq!(sizes, CacheSizes::OBSERVED);
    }

    #[test]
    fn per_level_sizes_round_down_to_cells() {
        let sizes = CacheSizes::from_per_level(33, 10, 3);

        assert_eq!(sizes.bytes(CacheLevel::L1), 32);
        assert_eq!(sizes.bytes(CacheLevel::L1L2), 40);
        assert_eq!(sizes.bytes(CacheLevel::L1L2L3), 40);
    }

    #[test]
    #[cfg(not(miri))] // Miri cannot query the processor.
    fn detected_sizes_are_valid() {
        let sizes = CacheSizes::detect();

        CacheSizes::new(
            sizes.bytes(CacheLevel::L1),
            sizes.bytes(CacheLevel::L1L2),
            sizes.bytes(CacheLevel::L1L2L3),
        )
        .unwrap();
    }
}
