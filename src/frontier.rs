use parking_lot::RwLock;
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Shared record of the best known cost to reach each byte position, used to
/// prune search branches. Records keep a strict staircase shape: positions
/// and costs both strictly increase, because an entry reaching at least as
/// far for no more cost makes every nearer, costlier entry obsolete.
///
/// A sentinel record of infinite cost sits at position 0 so the map is never
/// empty; it is an ordinary record and gets evicted once dominated.
///
/// `commit_if_viable` is the single unit of atomicity: the viability check
/// and the mutation happen under one exclusive lock. `viable` is advisory
/// only, for cheap pre-checks that skip obviously dead work.
pub struct CostFrontier {
    records: RwLock<BTreeMap<u64, f64>>,
}

impl CostFrontier {
    pub fn new() -> Self {
        let mut records = BTreeMap::new();
        records.insert(0, f64::INFINITY);
        CostFrontier {
            records: RwLock::new(records),
        }
    }

    /// Best recorded cost at exactly `position`, if any.
    pub fn cost_at(&self, position: u64) -> Option<f64> {
        self.records.read().get(&position).copied()
    }

    /// Whether a branch at `position` with `cost` could still be committed:
    /// false iff some record at an equal or farther position is strictly
    /// cheaper. Shared lock, safe for unlimited concurrent callers; the
    /// answer may be stale by the time the caller acts on it.
    pub fn viable(&self, position: u64, cost: f64) -> bool {
        Self::viable_locked(&self.records.read(), position, cost)
    }

    /// Commit `cost` at `position` if it is still viable, evicting every
    /// record it now dominates. Check and mutation are one critical section;
    /// this is the only operation that changes the record shape.
    pub fn commit_if_viable(&self, position: u64, cost: f64) -> bool {
        let mut records = self.records.write();
        if !Self::viable_locked(&records, position, cost) {
            return false;
        }

        // Walk lower positions from nearest to farthest, dropping every one
        // with equal or higher cost. The first strictly cheaper record ends
        // the scan: everything before it is cheaper still.
        let mut dominated: SmallVec<[u64; 8]> = SmallVec::new();
        for (&recorded_position, &recorded_cost) in records.range(..position).rev() {
            if recorded_cost >= cost {
                dominated.push(recorded_position);
            } else {
                break;
            }
        }
        for recorded_position in dominated {
            records.remove(&recorded_position);
        }

        // Ties at the same position are viable and overwrite.
        records.insert(position, cost);
        true
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ordered copy of the records, for inspection at quiescent points.
    pub fn snapshot(&self) -> Vec<(u64, f64)> {
        self.records
            .read()
            .iter()
            .map(|(&position, &cost)| (position, cost))
            .collect()
    }

    fn viable_locked(records: &BTreeMap<u64, f64>, position: u64, cost: f64) -> bool {
        // Under the staircase shape the nearest record at or past `position`
        // is the cheapest one there, so a single ceiling probe decides.
        match records.range(position..).next() {
            Some((_, &recorded_cost)) => recorded_cost >= cost,
            None => true,
        }
    }
}

impl Default for CostFrontier {
    fn default() -> Self {
        Self::new()
    }
}
