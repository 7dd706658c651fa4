use std::hint::black_box;

use crate::{BufferPolicy, CacheLevel, WipeBuffer, WipeConfig};

/// Evicts processor caches by walking a scratch buffer sized to a [`CacheLevel`].
///
/// Each call to [`wipe()`](Self::wipe) returns a [`Wiped`] handle. Take the start timestamp of
/// your measurement after the wipe returns and call [`Wiped::teardown()`] after the stop
/// timestamp, so that neither the wipe nor the release of its buffer is measured.
///
/// The wiper is single-threaded: a [`BufferPolicy::Reused`] buffer is mutated through
/// `&mut self` by each wipe.
///
/// # Examples
///
/// ```
/// use std::time::Instant;
///
/// use cache_wipe::{CacheLevel, CacheWiper, WipeConfig};
///
/// let mut wiper = CacheWiper::new(WipeConfig::default());
/// let data = vec![1_u64; 100];
///
/// let wiped = wiper.wipe(CacheLevel::L1L2);
///
/// let start = Instant::now();
/// std::hint::black_box(data.iter().sum::<u64>());
/// let elapsed = start.elapsed();
///
/// wiped.teardown();
///
/// println!("Cold-cache sum took {elapsed:?}");
/// ```
#[derive(Debug)]
pub struct CacheWiper {
    config: WipeConfig,

    // Only used with `BufferPolicy::Reused`.
    resident: Option<WipeBuffer>,
}

impl CacheWiper {
    /// Creates a wiper. No memory is allocated until the first wipe.
    #[must_use]
    pub fn new(config: WipeConfig) -> Self {
        Self {
            config,
            resident: None,
        }
    }

    /// The configuration the wiper was created with.
    #[must_use]
    pub fn config(&self) -> &WipeConfig {
        &self.config
    }

    /// Evicts the caches down to `level`.
    ///
    /// [`CacheLevel::None`] returns immediately without allocating or touching memory.
    ///
    /// # Panics
    ///
    /// Panics if the wipe buffer cannot be allocated.
    pub fn wipe(&mut self, level: CacheLevel) -> Wiped {
        let bytes = self.config.sizes().bytes(level);

        if bytes == 0 {
            return Wiped::default();
        }

        let stride = self.config.stride();

        let wiped = match self.config.policy() {
            BufferPolicy::PerTrial => {
                let mut buffer = WipeBuffer::allocate(bytes);
                let pass = buffer.wipe(stride);

                Wiped {
                    stats: WipeStats::new(bytes, pass.touched_cells(), pass.hash(), true),
                    buffer: Some(buffer),
                }
            }
            BufferPolicy::Reused => {
                let allocated = self
                    .resident
                    .as_ref()
                    .is_none_or(|buffer| buffer.len_bytes() != bytes);

                if allocated {
                    // Switching to a different level; the old buffer is the wrong size.
                    self.release();
                    self.resident = Some(WipeBuffer::allocate(bytes));
                }

                let buffer = self
                    .resident
                    .as_mut()
                    .expect("resident buffer was allocated above if it was missing");
                let pass = buffer.wipe(stride);

                Wiped {
                    stats: WipeStats::new(bytes, pass.touched_cells(), pass.hash(), allocated),
                    buffer: None,
                }
            }
        };

        tracing::trace!(%level, stats = ?wiped.stats, "wiped cache");

        wiped
    }

    /// Releases the buffer kept by [`BufferPolicy::Reused`], if any.
    ///
    /// The next wipe allocates a new one.
    pub fn release(&mut self) {
        if let Some(buffer) = self.resident.take() {
            buffer.teardown();
        }
    }

    /// Whether the wiper is currently holding on to a reused buffer.
    #[must_use]
    pub fn has_resident_buffer(&self) -> bool {
        self.resident.is_some()
    }
}

impl Default for CacheWiper {
    fn default() -> Self {
        Self::new(WipeConfig::default())
    }
}

/// The result of a wipe, to be torn down after the measurement is complete.
///
/// With [`BufferPolicy::PerTrial`] this owns the wipe buffer.
#[derive(Debug, Default)]
#[must_use = "call teardown() after the measurement, otherwise the buffer is released at an arbitrary point"]
pub struct Wiped {
    stats: WipeStats,
    buffer: Option<WipeBuffer>,
}

impl Wiped {
    /// What the wipe did.
    #[must_use]
    pub fn stats(&self) -> WipeStats {
        self.stats
    }

    /// Consumes the wipe result through the optimization barrier and releases any buffer it owns.
    pub fn teardown(self) {
        black_box(self.stats.hash);

        if let Some(buffer) = self.buffer {
            buffer.teardown();
        }
    }
}

/// Describes what a single wipe did.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct WipeStats {
    buffer_bytes: usize,
    touched_cells: usize,
    hash: u32,
    allocated: bool,
}

impl WipeStats {
    fn new(buffer_bytes: usize, touched_cells: usize, hash: u32, allocated: bool) -> Self {
        Self {
            buffer_bytes,
            touched_cells,
            hash,
            allocated,
        }
    }

    /// The size of the buffer that was walked, in bytes. Zero if nothing was wiped.
    #[must_use]
    pub fn buffer_bytes(&self) -> usize {
        self.buffer_bytes
    }

    /// How many 4-byte cells were read and overwritten.
    #[must_use]
    pub fn touched_cells(&self) -> usize {
        self.touched_cells
    }

    /// The final value of the running hash.
    #[must_use]
    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// Whether this wipe had to allocate a new buffer.
    #[must_use]
    pub fn allocated(&self) -> bool {
        self.allocated
    }
}
