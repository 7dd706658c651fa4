use std::hint::black_box;
use std::mem;
use std::num::NonZero;

use rand::Rng;

/// Scratch memory whose only purpose is to push other data out of the processor caches.
///
/// The buffer is a contiguous array of 4-byte cells, filled with pseudo-random values when
/// allocated. Its contents carry no meaning.
///
/// You typically do not create one directly; [`CacheWiper`](crate::CacheWiper) does that for you.
#[derive(Debug)]
pub struct WipeBuffer {
    cells: Box<[u32]>,
}

impl WipeBuffer {
    /// Allocates a buffer of `bytes` bytes, rounded down to whole 4-byte cells.
    ///
    /// # Panics
    ///
    /// Panics if the memory cannot be allocated. There is no way to recover from this; a
    /// benchmark that cannot wipe the cache cannot produce meaningful results.
    #[must_use]
    pub fn allocate(bytes: usize) -> Self {
        let cell_count = bytes
            .checked_div(mem::size_of::<u32>())
            .expect("cell size is a non-zero constant");

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(cell_count)
            .unwrap_or_else(|e| panic!("failed to allocate {bytes}-byte cache wipe buffer: {e}"));
        cells.resize(cell_count, 0_u32);

        rand::rng().fill(cells.as_mut_slice());

        tracing::debug!(bytes, cell_count, "allocated cache wipe buffer");

        Self {
            cells: cells.into_boxed_slice(),
        }
    }

    /// The size of the buffer in bytes.
    #[must_use]
    pub fn len_bytes(&self) -> usize {
        self.cells
            .len()
            .checked_mul(mem::size_of::<u32>())
            .expect("the buffer was allocated with this many bytes, so it cannot overflow")
    }

    /// Walks the buffer, reading and then overwriting every `stride`-th cell with a running
    /// XOR hash of the cells visited so far.
    pub fn wipe(&mut self, stride: NonZero<usize>) -> WipePass {
        let mut hash = 0_u32;
        let mut touched_cells = 0_usize;

        for cell in self.cells.iter_mut().step_by(stride.get()) {
            hash ^= *cell;
            *cell = hash;
            touched_cells = touched_cells.wrapping_add(1);
        }

        // The hash depends on every visited cell, so this keeps the whole loop alive.
        WipePass {
            hash: black_box(hash),
            touched_cells,
        }
    }

    /// Consumes the buffer contents through the optimization barrier and releases the memory.
    pub fn teardown(self) {
        let digest = self.cells.iter().fold(0_u32, |acc, cell| acc ^ cell);
        black_box(digest);

        tracing::trace!(bytes = self.len_bytes(), "releasing cache wipe buffer");
    }
}

/// The outcome of a single pass over a [`WipeBuffer`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WipePass {
    hash: u32,
    touched_cells: usize,
}

impl WipePass {
    /// The final value of the running hash.
    #[must_use]
    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// How many cells the pass read and overwrote.
    #[must_use]
    pub fn touched_cells(&self) -> usize {
        self.touched_cells
    }
}
