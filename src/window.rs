use std::collections::VecDeque;

use crate::models::AttentionSample;

pub const DEFAULT_WINDOW_CAPACITY: usize = 20;

/// Bounded FIFO of the most recent attention samples, in arrival order.
#[derive(Debug, Clone)]
pub struct AttentionWindow {
    samples: VecDeque<AttentionSample>,
    capacity: usize,
}

impl AttentionWindow {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_WINDOW_CAPACITY)
    }

    /// A zero capacity is clamped to one so the latest sample is always kept.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: AttentionSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Owned copy of the current contents; later pushes never show up in it.
    pub fn snapshot(&self) -> Vec<AttentionSample> {
        self.samples.iter().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&AttentionSample> {
        self.samples.back()
    }

    pub fn mean_score(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let total: f64 = self.samples.iter().map(|s| s.score).sum();
        Some(total / self.samples.len() as f64)
    }
}

impl Default for AttentionWindow {
    fn default() -> Self {
        Self::new()
    }
}
