//! Sample Ring Buffer
//!
//! Holds the most recent N samples of the incoming stream. The write cursor is
//! monotonic; the physical slot is `cursor & (N - 1)`. Callers only ever see
//! chronological snapshots, never the ring layout.

/// Fixed-capacity ring of signed samples
#[derive(Clone)]
pub struct SampleBuffer {
    /// Ring storage, length is a power of two
    ring: Box<[i32]>,
    /// Capacity mask for fast modulo: `pos & mask == pos % capacity`
    mask: usize,
    /// Total samples written since the last reset
    written: u64,
    /// Slots written at least once, saturates at capacity
    filled: usize,
}

impl SampleBuffer {
    /// Create a buffer holding `capacity` samples
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a power of two. Configuration is normalized
    /// by the caller before it reaches the buffer.
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity.is_power_of_two(),
            "sample buffer capacity must be a power of two, got {capacity}"
        );
        SampleBuffer {
            ring: vec![0; capacity].into_boxed_slice(),
            mask: capacity - 1,
            written: 0,
            filled: 0,
        }
    }

    /// Window size N
    pub fn capacity(&self) -> usize {
        self.ring.len()
    }

    /// Slots written at least once since the last reset
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Total samples pushed since the last reset
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Write one sample and advance the cursor
    #[inline]
    pub fn push(&mut self, sample: i32) {
        let slot = (self.written as usize) & self.mask;
        self.ring[slot] = sample;
        self.written += 1;
        if self.filled < self.ring.len() {
            self.filled += 1;
        }
    }

    /// Write a block; advances only by the samples actually supplied
    pub fn push_block(&mut self, samples: &[i32]) -> usize {
        for &sample in samples {
            self.push(sample);
        }
        samples.len()
    }

    /// Check if a full analysis window has been written since the last reset
    pub fn is_window_full(&self) -> bool {
        self.filled == self.ring.len()
    }

    /// The last N samples, oldest first
    pub fn snapshot(&self) -> Vec<i32> {
        let mut out = vec![0; self.ring.len()];
        self.snapshot_into(&mut out);
        out
    }

    /// Copy the last N samples, oldest first, into `dest`
    ///
    /// # Panics
    ///
    /// Panics if `dest.len()` differs from the capacity.
    pub fn snapshot_into(&self, dest: &mut [i32]) {
        assert_eq!(dest.len(), self.ring.len(), "snapshot length mismatch");
        let start = (self.written as usize) & self.mask;
        let first_part = self.ring.len() - start;
        dest[..first_part].copy_from_slice(&self.ring[start..]);
        dest[first_part..].copy_from_slice(&self.ring[..start]);
    }

    /// Discard all samples and the fill count
    pub fn reset(&mut self) {
        self.ring.fill(0);
        self.written = 0;
        self.filled = 0;
    }
}

impl std::fmt::Debug for SampleBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleBuffer")
            .field("capacity", &self.ring.len())
            .field("written", &self.written)
            .field("filled", &self.filled)
            .finish_non_exhaustive()
    }
}
