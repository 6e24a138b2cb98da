use rustc_hash::FxHashSet;

use crate::chunk::{Chunk, CostModel};
use crate::error::PlanError;

/// A fully validated problem description: target byte count, cost model, and
/// the deduplicated chunk set.
#[derive(Debug, Clone)]
pub struct Problem {
    pub target: u64,
    pub model: CostModel,
    pub chunks: Vec<Chunk>,
}

/// Parse the textual problem format:
///
/// ```text
/// N          target byte count
/// L          latency
/// B          bandwidth (bytes/second)
/// C          number of chunks
/// left,right one line per chunk
/// ```
pub fn problem(text: &str) -> Result<Problem, PlanError> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

    let target = header_value(lines.next(), "target byte count")?;
    let latency = header_value(lines.next(), "latency")?;
    let bandwidth = header_value(lines.next(), "bandwidth")?;
    let declared = header_value(lines.next(), "chunk count")? as usize;

    if bandwidth == 0 {
        return Err(PlanError::Input("bandwidth must be positive".to_string()));
    }

    let mut seen = FxHashSet::default();
    let mut chunks = Vec::new();
    let mut min_left = u64::MAX;
    let mut max_right = 0;
    for line in lines {
        let (left, right) = chunk_bounds(line)?;
        if right <= left {
            return Err(PlanError::Parse(format!(
                "chunk bounds out of order: {}",
                line
            )));
        }
        min_left = min_left.min(left);
        max_right = max_right.max(right);
        if seen.insert((left, right)) {
            chunks.push(Chunk::new(left, right));
        }
    }

    if chunks.len() != declared {
        return Err(PlanError::Input(format!(
            "declared {} chunks but found {}",
            declared,
            chunks.len()
        )));
    }
    if chunks.is_empty() || min_left > 0 || max_right < target {
        return Err(PlanError::Input(
            "chunk set does not span the target range".to_string(),
        ));
    }

    Ok(Problem {
        target,
        model: CostModel::new(latency, bandwidth),
        chunks,
    })
}

fn header_value(line: Option<&str>, what: &str) -> Result<u64, PlanError> {
    let line = line.ok_or_else(|| PlanError::Parse(format!("missing {}", what)))?;
    line.parse()
        .map_err(|_| PlanError::Parse(format!("bad {}: {}", what, line)))
}

fn chunk_bounds(line: &str) -> Result<(u64, u64), PlanError> {
    let (left, right) = line
        .split_once(',')
        .ok_or_else(|| PlanError::Parse(format!("bad chunk line: {}", line)))?;
    Ok((left.trim().parse()?, right.trim().parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_well_formed_problem() {
        let text = "2000\n15\n10\n3\n0,200\n200,400\n0,2000\n";
        let problem = problem(text).unwrap();
        assert_eq!(problem.target, 2000);
        assert_eq!(problem.model, CostModel::new(15, 10));
        assert_eq!(
            problem.chunks,
            vec![Chunk::new(0, 200), Chunk::new(200, 400), Chunk::new(0, 2000)]
        );
    }

    #[test]
    fn test_duplicate_bounds_collapse() {
        // Two identical lines collapse to one chunk, matching the declared
        // count of 1.
        let problem = problem("10\n0\n1\n1\n0,10\n0,10\n").unwrap();
        assert_eq!(problem.chunks, vec![Chunk::new(0, 10)]);
    }

    #[test]
    fn test_rejects_zero_bandwidth() {
        let err = problem("10\n0\n0\n1\n0,10\n").unwrap_err();
        assert!(matches!(err, PlanError::Input(_)));
    }

    #[test]
    fn test_rejects_count_mismatch() {
        let err = problem("10\n0\n1\n2\n0,10\n").unwrap_err();
        assert!(matches!(err, PlanError::Input(_)));
    }

    #[test]
    fn test_rejects_degenerate_chunk() {
        let err = problem("10\n0\n1\n1\n5,5\n").unwrap_err();
        assert!(matches!(err, PlanError::Parse(_)));
    }

    #[test]
    fn test_rejects_non_spanning_set() {
        // min left > 0
        let err = problem("10\n0\n1\n1\n2,10\n").unwrap_err();
        assert!(matches!(err, PlanError::Input(_)));
        // max right < target
        let err = problem("10\n0\n1\n1\n0,8\n").unwrap_err();
        assert!(matches!(err, PlanError::Input(_)));
    }

    #[test]
    fn test_rejects_malformed_lines() {
        assert!(matches!(
            problem("10\n0\n1\n1\n0:10\n").unwrap_err(),
            PlanError::Parse(_)
        ));
        assert!(matches!(
            problem("10\n0\n1\n1\n0,ten\n").unwrap_err(),
            PlanError::Parse(_)
        ));
        assert!(matches!(
            problem("10\n0\n").unwrap_err(),
            PlanError::Parse(_)
        ));
    }
}
