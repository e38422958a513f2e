use std::collections::VecDeque;

/// Fixed-capacity FIFO of recent values with an on-demand arithmetic mean.
///
/// The mean is recomputed from the current contents on every read instead of
/// being maintained incrementally, so no floating-point drift accumulates.
#[derive(Debug, Clone, PartialEq)]
pub struct SlidingWindow {
    capacity: usize,
    values: VecDeque<f64>,
}

impl SlidingWindow {
    pub const DEFAULT_CAPACITY: usize = 10;

    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Appends `value`, evicting the oldest entry once over capacity, and
    /// returns the mean of the retained values.
    pub fn push(&mut self, value: f64) -> f64 {
        self.values.push_back(value);
        while self.values.len() > self.capacity {
            self.values.pop_front();
        }
        self.mean()
    }

    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0_f64;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }
}

impl Default for SlidingWindow {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
