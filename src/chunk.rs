use serde::Serialize;
use std::fmt;

/// Latency/bandwidth pair used to price chunk requests. Fixed for the
/// duration of one solve and passed explicitly wherever a cost is computed,
/// so solves with different parameters can run side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostModel {
    pub latency: u64,
    pub bandwidth: u64,
}

impl CostModel {
    pub fn new(latency: u64, bandwidth: u64) -> Self {
        CostModel { latency, bandwidth }
    }
}

/// Half-open byte interval `[left, right)` offered by the remote source.
/// Two chunks are the same chunk iff their bounds match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Chunk {
    pub left: u64,
    pub right: u64,
}

impl Chunk {
    pub fn new(left: u64, right: u64) -> Self {
        debug_assert!(right > left, "chunk must have positive size");
        Chunk { left, right }
    }

    pub fn contains(&self, index: u64) -> bool {
        index >= self.left && index < self.right
    }

    pub fn size(&self) -> u64 {
        self.right - self.left
    }

    /// Cost to request and transmit this chunk: one round trip each way plus
    /// transfer time. Monotone in size for a fixed model.
    pub fn cost(&self, model: CostModel) -> f64 {
        (2 * model.latency) as f64 + self.size() as f64 / model.bandwidth as f64
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.left, self.right)
    }
}
