/// Fixed-capacity ring buffer of sensor samples with an incrementally
/// maintained running sum.
///
/// The slots are pre-seeded with zeros, so the aggregate is well-defined
/// from the very first push: a fresh window biases low until it has seen
/// `capacity` real samples, which avoids a separate warm-up state.
///
/// The sum is updated in the same operation that swaps a slot, so
/// `sum == Σ(slots)` holds between any two calls.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    slots: Vec<u32>,
    head: usize,
    sum: u64,
}

impl SampleWindow {
    /// Create a window of `capacity` slots, all zero.
    ///
    /// `capacity` must be at least 1; config validation enforces this
    /// before a window is ever constructed.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![0; capacity],
            head: 0,
            sum: 0,
        }
    }

    /// Evict the oldest sample, insert `sample` in its place, and return
    /// the updated running sum.
    pub fn push(&mut self, sample: u32) -> u64 {
        let evicted = self.slots[self.head];
        self.sum -= u64::from(evicted);
        self.slots[self.head] = sample;
        self.sum += u64::from(sample);
        self.head = (self.head + 1) % self.slots.len();
        self.sum
    }

    pub fn sum(&self) -> u64 {
        self.sum
    }

    /// Arithmetic mean over the full window, counting pre-seeded zeros.
    pub fn mean(&self) -> f64 {
        self.sum as f64 / self.slots.len() as f64
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Zero every slot and the running sum.
    pub fn reset(&mut self) {
        self.slots.fill(0);
        self.head = 0;
        self.sum = 0;
    }

    /// Recompute the sum by scanning the slots. Exists so tests can check
    /// the incremental sum against ground truth; never needed on the hot
    /// path.
    pub fn recomputed_sum(&self) -> u64 {
        self.slots.iter().copied().map(u64::from).sum()
    }
}
