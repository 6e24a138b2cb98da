use itertools::Itertools;

use crate::chunk::Chunk;
use crate::median::MedianEstimator;

/// Centered interval tree over an immutable chunk set, answering "which
/// chunks cover byte position X" in O(log n + k). Built once, never mutated,
/// safe for any number of concurrent readers afterwards.
///
/// Nodes live in a flat arena and refer to children by index. Construction
/// partitions on the median of all subtree endpoints and builds the two child
/// subtrees in parallel, joining both before the parent links them.
pub struct IntervalIndex {
    nodes: Vec<Node>,
    root: Option<usize>,
}

struct Node {
    key: u64,
    /// Chunks straddling `key`, ascending by left bound.
    by_left: Vec<Chunk>,
    /// The same chunks, descending by right bound.
    by_right: Vec<Chunk>,
    left: Option<usize>,
    right: Option<usize>,
}

/// Intermediate owned tree produced by the parallel recursion, flattened into
/// the arena once construction is complete.
struct Subtree {
    key: u64,
    by_left: Vec<Chunk>,
    by_right: Vec<Chunk>,
    left: Option<Box<Subtree>>,
    right: Option<Box<Subtree>>,
}

impl IntervalIndex {
    pub fn build(chunks: Vec<Chunk>) -> Self {
        if chunks.is_empty() {
            return IntervalIndex {
                nodes: Vec::new(),
                root: None,
            };
        }
        let tree = build_subtree(chunks);
        let mut nodes = Vec::new();
        let root = flatten(tree, &mut nodes);
        IntervalIndex {
            nodes,
            root: Some(root),
        }
    }

    /// Number of tree nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All chunks whose interval contains `position`, in no particular order.
    pub fn covering(&self, position: u64) -> Vec<Chunk> {
        let mut output = Vec::new();
        let mut cursor = self.root;
        while let Some(index) = cursor {
            let node = &self.nodes[index];
            if position == node.key {
                // Everything stored here straddles the key, no filtering needed.
                output.extend_from_slice(&node.by_left);
                break;
            } else if position < node.key {
                for chunk in &node.by_left {
                    if chunk.left > position {
                        // Sorted ascending by left, the rest fail too.
                        break;
                    }
                    output.push(*chunk);
                }
                cursor = node.left;
            } else {
                for chunk in &node.by_right {
                    if chunk.right <= position {
                        break;
                    }
                    output.push(*chunk);
                }
                cursor = node.right;
            }
        }
        output
    }
}

fn build_subtree(chunks: Vec<Chunk>) -> Subtree {
    let mut estimator = MedianEstimator::with_capacity(chunks.len() * 2);
    for chunk in &chunks {
        estimator.enter(chunk.left);
        estimator.enter(chunk.right);
    }
    let key = estimator.median().expect("subtree chunk set is never empty");

    let mut current = Vec::new();
    let mut left_subset = Vec::new();
    let mut right_subset = Vec::new();
    for chunk in chunks {
        if chunk.left <= key && chunk.right > key {
            current.push(chunk);
        } else if chunk.left > key {
            right_subset.push(chunk);
        } else {
            left_subset.push(chunk);
        }
    }

    let by_left: Vec<Chunk> = current.iter().copied().sorted_by_key(|c| c.left).collect();
    let by_right: Vec<Chunk> = current
        .into_iter()
        .sorted_by_key(|c| std::cmp::Reverse(c.right))
        .collect();

    // Subsets are disjoint, so the children build independently. Both joins
    // complete before the parent exists.
    let (left, right) = rayon::join(
        || (!left_subset.is_empty()).then(|| Box::new(build_subtree(left_subset))),
        || (!right_subset.is_empty()).then(|| Box::new(build_subtree(right_subset))),
    );

    Subtree {
        key,
        by_left,
        by_right,
        left,
        right,
    }
}

fn flatten(tree: Subtree, nodes: &mut Vec<Node>) -> usize {
    let left = tree.left.map(|child| flatten(*child, nodes));
    let right = tree.right.map(|child| flatten(*child, nodes));
    nodes.push(Node {
        key: tree.key,
        by_left: tree.by_left,
        by_right: tree.by_right,
        left,
        right,
    });
    nodes.len() - 1
}
