use std::num::NonZero;

use crate::CacheSizes;

/// The default wipe stride: one 4-byte cell out of every 8, i.e. one touch per 32 bytes.
pub const DEFAULT_STRIDE: NonZero<usize> = NonZero::new(8).unwrap();

/// Determines what happens to the wipe buffer between wipes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum BufferPolicy {
    /// Every wipe allocates a fresh buffer, which the caller releases via
    /// [`Wiped::teardown()`](crate::Wiped::teardown) once the measurement is over.
    /// This is the default.
    #[default]
    PerTrial,

    /// The wiper allocates a buffer on first use and keeps reusing it for every wipe of the
    /// same size, releasing it when the wiper is dropped or
    /// [`release()`](crate::CacheWiper::release)d.
    Reused,
}

/// Everything a [`CacheWiper`](crate::CacheWiper) needs to know to do its job.
///
/// # Examples
///
/// ```
/// use cache_wipe::{BufferPolicy, CacheSizes, WipeConfig};
/// use std::num::NonZero;
///
/// let config = WipeConfig::builder()
///     .sizes(CacheSizes::new(48 * 1024, 1328 * 1024, 33_096 * 1024).unwrap())
///     .stride(NonZero::new(16).unwrap())
///     .policy(BufferPolicy::Reused)
///     .build();
///
/// assert_eq!(config.stride().get(), 16);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WipeConfig {
    sizes: CacheSizes,
    stride: NonZero<usize>,
    policy: BufferPolicy,
}

impl WipeConfig {
    /// Starts building a configuration. Any value not specified takes its default.
    pub fn builder() -> WipeConfigBuilder {
        WipeConfigBuilder {
            config: Self::default(),
        }
    }

    /// The table that maps cache levels to buffer sizes.
    #[must_use]
    pub fn sizes(&self) -> &CacheSizes {
        &self.sizes
    }

    /// How many 4-byte cells to advance between touches.
    #[must_use]
    pub fn stride(&self) -> NonZero<usize> {
        self.stride
    }

    /// What happens to the wipe buffer between wipes.
    #[must_use]
    pub fn policy(&self) -> BufferPolicy {
        self.policy
    }
}

impl Default for WipeConfig {
    fn default() -> Self {
        Self {
            sizes: CacheSizes::default(),
            stride: DEFAULT_STRIDE,
            policy: BufferPolicy::default(),
        }
    }
}

/// Builds a [`WipeConfig`].
#[derive(Debug)]
#[must_use]
pub struct WipeConfigBuilder {
    config: WipeConfig,
}

impl WipeConfigBuilder {
    /// Sets the table that maps cache levels to buffer sizes.
    pub fn sizes(mut self, sizes: CacheSizes) -> Self {
        self.config.sizes = sizes;
        self
    }

    /// Sets how many 4-byte cells to advance between touches.
    pub fn stride(mut self, stride: NonZero<usize>) -> Self {
        self.config.stride = stride;
        self
    }

    /// Sets what happens to the wipe buffer between wipes.
    pub fn policy(mut self, policy: BufferPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Completes the configuration.
    #[must_use]
    pub fn build(self) -> WipeConfig {
        self.config
    }
}
