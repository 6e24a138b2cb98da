use rayon::Scope;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::chunk::{Chunk, CostModel};
use crate::frontier::CostFrontier;
use crate::index::IntervalIndex;

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Cancel the whole search as soon as any branch reaches a position no
    /// chunk covers, and report no solution even if one was already found.
    /// Off by default: a gapped branch is simply dead, and "no solution" is
    /// reported only when no branch ever reaches the target.
    pub abort_on_gap: bool,
}

/// Result of one solve: the minimal total cost reaching the target, and one
/// chunk sequence achieving it. Both absent when the range cannot be covered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    pub best_cost: Option<f64>,
    pub best_sequence: Option<Vec<Chunk>>,
}

/// Find the cheapest chunk sequence covering `[0, target)`. Duplicate chunk
/// bounds collapse before the index is built.
pub fn solve(target: u64, model: CostModel, chunks: Vec<Chunk>) -> Solution {
    solve_with(target, model, chunks, SearchOptions::default())
}

pub fn solve_with(
    target: u64,
    model: CostModel,
    chunks: Vec<Chunk>,
    options: SearchOptions,
) -> Solution {
    if target == 0 {
        // Nothing to fetch: covered by the empty sequence at zero cost.
        return Solution {
            best_cost: Some(0.0),
            best_sequence: Some(Vec::new()),
        };
    }

    let mut seen = FxHashSet::default();
    let unique: Vec<Chunk> = chunks
        .into_iter()
        .filter(|chunk| seen.insert((chunk.left, chunk.right)))
        .collect();

    let index = IntervalIndex::build(unique);
    Searcher::new(target, model, &index, options).run()
}

/// Parallel branch-and-bound over partial covers. Each branch owns its chunk
/// prefix; the frontier is the only shared mutable state.
pub struct Searcher<'a> {
    target: u64,
    model: CostModel,
    index: &'a IntervalIndex,
    options: SearchOptions,
    frontier: CostFrontier,
    best: Mutex<Option<(f64, Vec<Chunk>)>>,
    cancelled: AtomicBool,
}

impl<'a> Searcher<'a> {
    pub fn new(
        target: u64,
        model: CostModel,
        index: &'a IntervalIndex,
        options: SearchOptions,
    ) -> Self {
        Searcher {
            target,
            model,
            index,
            options,
            frontier: CostFrontier::new(),
            best: Mutex::new(None),
            cancelled: AtomicBool::new(false),
        }
    }

    pub fn run(&self) -> Solution {
        rayon::scope(|scope| self.branch(scope, 0, 0.0, Vec::new()));

        if self.cancelled.load(Ordering::Acquire) {
            return Solution {
                best_cost: None,
                best_sequence: None,
            };
        }

        let best_cost = self
            .frontier
            .cost_at(self.target)
            .filter(|cost| cost.is_finite());
        let best_sequence = if best_cost.is_some() {
            self.best.lock().take().map(|(_, sequence)| sequence)
        } else {
            None
        };
        Solution {
            best_cost,
            best_sequence,
        }
    }

    /// Pruning record accumulated so far; stable only once `run` returns.
    pub fn frontier(&self) -> &CostFrontier {
        &self.frontier
    }

    fn branch<'s>(&'s self, scope: &Scope<'s>, position: u64, cost: f64, prefix: Vec<Chunk>) {
        if self.cancelled.load(Ordering::Acquire) {
            return;
        }

        let mut candidates = self.index.covering(position);
        if candidates.is_empty() {
            if self.options.abort_on_gap {
                self.cancelled.store(true, Ordering::Release);
            }
            return;
        }

        // Cheapest first: for a fixed model, cost is monotone in size.
        candidates.sort_unstable_by_key(|chunk| chunk.size());

        for next in candidates {
            let branch_cost = cost + next.cost(self.model);

            // Advisory read-side prune: a record at or past this chunk's
            // right edge that is already cheaper dooms both commits below.
            // The commit re-checks under its own lock, so staleness here
            // only costs a wasted attempt.
            if !self.frontier.viable(next.right, branch_cost) {
                continue;
            }

            if next.right >= self.target && self.frontier.commit_if_viable(self.target, branch_cost)
            {
                self.publish(branch_cost, &prefix, next);
            } else if self.frontier.commit_if_viable(next.right, branch_cost) {
                let mut branch_prefix = prefix.clone();
                branch_prefix.push(next);
                scope.spawn(move |scope| {
                    self.branch(scope, next.right, branch_cost, branch_prefix)
                });
            }
        }
    }

    fn publish(&self, cost: f64, prefix: &[Chunk], last: Chunk) {
        if self.cancelled.load(Ordering::Acquire) {
            return;
        }
        let mut sequence = prefix.to_vec();
        sequence.push(last);

        // Completions race; keep the cheapest, breaking exact cost ties by
        // chunk bounds so repeated runs agree.
        let mut best = self.best.lock();
        let replace = match best.as_ref() {
            None => true,
            Some((recorded_cost, recorded_sequence)) => {
                cost < *recorded_cost || (cost == *recorded_cost && sequence < *recorded_sequence)
            }
        };
        if replace {
            *best = Some((cost, sequence));
        }
    }
}
