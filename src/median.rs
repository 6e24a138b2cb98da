use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Streaming median over a series of u64 values, kept as one max-heap below
/// the median and one min-heap above it. Amortized O(log k) per insertion,
/// O(1) per query. Not thread safe; each index-construction task owns its own
/// estimator.
pub struct MedianEstimator {
    below: BinaryHeap<u64>,
    above: BinaryHeap<Reverse<u64>>,
}

impl MedianEstimator {
    pub fn new() -> Self {
        MedianEstimator {
            below: BinaryHeap::new(),
            above: BinaryHeap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MedianEstimator {
            below: BinaryHeap::with_capacity(capacity / 2 + 1),
            above: BinaryHeap::with_capacity(capacity / 2 + 1),
        }
    }

    pub fn enter(&mut self, value: u64) {
        match self.below.peek() {
            Some(&top) if value >= top => self.above.push(Reverse(value)),
            _ => self.below.push(value),
        }
        self.rebalance();
    }

    /// Median of everything entered so far. For an even count this is the
    /// integer midpoint of the two central values, rounded toward the lower.
    pub fn median(&self) -> Option<u64> {
        match self.diff() {
            _ if self.len() == 0 => None,
            d if d > 0 => self.below.peek().copied(),
            d if d < 0 => self.above.peek().map(|r| r.0),
            _ => {
                let lo = *self.below.peek().expect("balanced heaps are non-empty");
                let hi = self.above.peek().expect("balanced heaps are non-empty").0;
                Some(lo + (hi - lo) / 2)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.below.len() + self.above.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn rebalance(&mut self) {
        if self.diff() > 1 {
            if let Some(top) = self.below.pop() {
                self.above.push(Reverse(top));
            }
        } else if self.diff() < -1 {
            if let Some(Reverse(bottom)) = self.above.pop() {
                self.below.push(bottom);
            }
        }
    }

    fn diff(&self) -> isize {
        self.below.len() as isize - self.above.len() as isize
    }
}

impl Default for MedianEstimator {
    fn default() -> Self {
        Self::new()
    }
}
