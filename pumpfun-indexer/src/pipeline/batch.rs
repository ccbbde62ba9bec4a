//! Size-triggered swap batch

use crate::models::SwapEvent;

/// Pending swaps awaiting a bulk insert
#[derive(Debug)]
pub struct SwapBatch {
    items: Vec<SwapEvent>,
    threshold: usize,
}

impl SwapBatch {
    pub fn new(threshold: usize) -> Self {
        let threshold = threshold.max(1);
        Self {
            items: Vec::with_capacity(threshold),
            threshold,
        }
    }

    /// Append a swap. When the threshold is reached the full batch is
    /// returned in arrival order and the buffer starts over empty.
    pub fn push(&mut self, swap: SwapEvent) -> Option<Vec<SwapEvent>> {
        self.items.push(swap);
        if self.items.len() >= self.threshold {
            Some(self.take())
        } else {
            None
        }
    }

    /// Drain whatever is pending
    pub fn take(&mut self) -> Vec<SwapEvent> {
        std::mem::replace(&mut self.items, Vec::with_capacity(self.threshold))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}
