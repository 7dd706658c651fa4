use std::str::FromStr;

/// How deep into the processor cache hierarchy to evict data before a timed measurement.
///
/// Each level is cumulative: [`CacheLevel::L1L2`] evicts both the L1 and the L2 cache.
/// The byte size that corresponds to a level is determined by a
/// [`CacheSizes`](crate::CacheSizes) table.
///
/// # Examples
///
/// ```
/// use cache_wipe::CacheLevel;
///
/// let level: CacheLevel = "l1+l2".parse().unwrap();
/// assert_eq!(level, CacheLevel::L1L2);
/// assert_eq!(level.to_string(), "L1+L2");
/// ```
#[derive(
    Clone, Copy, Debug, Default, derive_more::Display, Eq, Hash, Ord, PartialEq, PartialOrd,
)]
#[non_exhaustive]
pub enum CacheLevel {
    /// Do not evict anything. This is the default.
    #[default]
    #[display("none")]
    None,

    /// Evict the L1 data cache.
    #[display("L1")]
    L1,

    /// Evict the L1 and L2 caches.
    #[display("L1+L2")]
    L1L2,

    /// Evict the L1, L2 and L3 caches.
    #[display("L1+L2+L3")]
    L1L2L3,
}

impl CacheLevel {
    /// Every cache level, from shallowest to deepest.
    pub const ALL: [Self; 4] = [Self::None, Self::L1, Self::L1L2, Self::L1L2L3];

    /// Every cache level that actually evicts something.
    pub const EVICTING: [Self; 3] = [Self::L1, Self::L1L2, Self::L1L2L3];

    /// Whether this level skips eviction entirely.
    #[must_use]
    pub fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

impl FromStr for CacheLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "0" => Ok(Self::None),
            "l1" | "1" => Ok(Self::L1),
            "l1+l2" | "l1_l2" | "l2" | "2" => Ok(Self::L1L2),
            "l1+l2+l3" | "l1_l2_l3" | "l3" | "3" => Ok(Self::L1L2L3),
            _ => Err(format!(
                "invalid cache level: '{s}'. Valid options are: none, l1, l1+l2, l1+l2+l3"
            )),
        }
    }
}
