use fetchplan::chunk::{Chunk, CostModel};
use fetchplan::index::IntervalIndex;
use fetchplan::parse;
use fetchplan::search::{SearchOptions, Searcher, solve};

/// Deterministic chunk generator so repeated runs see the same instance.
fn generated_chunks(count: usize, span: u64, seed: u64) -> Vec<Chunk> {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        state >> 33
    };
    let mut chunks = Vec::with_capacity(count + 1);
    // Guarantee coverage exists: a ladder of touching chunks over the span.
    let step = span / 8;
    for i in 0..8 {
        chunks.push(Chunk::new(i * step, ((i + 1) * step).min(span).max(i * step + 1)));
    }
    while chunks.len() < count {
        let left = next() % span;
        let size = 1 + next() % (span / 4);
        chunks.push(Chunk::new(left, (left + size).min(span).max(left + 1)));
    }
    let mut seen = std::collections::HashSet::new();
    chunks.retain(|chunk| seen.insert((chunk.left, chunk.right)));
    chunks
}

#[test]
fn test_parse_then_solve_small_problem() {
    let text = "2000\n15\n10\n7\n0,200\n200,400\n400,600\n600,800\n800,1000\n1000,2000\n0,1800\n";
    let problem = parse::problem(text).unwrap();
    let solution = solve(problem.target, problem.model, problem.chunks);

    let cost = solution.best_cost.expect("problem is coverable");
    let sequence = solution.best_sequence.expect("problem is coverable");

    // [0,1800) + [1000,2000) beats the six-step ladder once latency is 15.
    assert_eq!(cost, 340.0);
    assert_eq!(
        sequence,
        vec![Chunk::new(0, 1800), Chunk::new(1000, 2000)]
    );
}

#[test]
fn test_lower_latency_prefers_ladder() {
    let text = "2000\n5\n10\n7\n0,200\n200,400\n400,600\n600,800\n800,1000\n1000,2000\n0,1800\n";
    let problem = parse::problem(text).unwrap();
    let solution = solve(problem.target, problem.model, problem.chunks);

    // Ladder: 6 requests * 10 latency + 200 transfer = 260.
    // Overlap route: [0,1800)+[1000,2000) = 20 + 280 = 300.
    assert_eq!(solution.best_cost, Some(260.0));
}

#[test]
fn test_large_instance_idempotent_cost() {
    let span = 1 << 20;
    let chunks = generated_chunks(300, span, 0xfe7c);
    let model = CostModel::new(12, 64);

    let first = solve(span, model, chunks.clone());
    let cost = first.best_cost.expect("ladder guarantees coverage");

    for _ in 0..3 {
        let again = solve(span, model, chunks.clone());
        assert_eq!(again.best_cost, Some(cost));
    }

    // The winning sequence prices out to exactly the reported cost and
    // covers the whole range without gaps.
    let sequence = first.best_sequence.expect("ladder guarantees coverage");
    let total: f64 = sequence.iter().map(|chunk| chunk.cost(model)).sum();
    assert!((total - cost).abs() < 1e-6);
    let mut reached = 0;
    for chunk in &sequence {
        assert!(chunk.left <= reached, "gap before {}", chunk);
        reached = reached.max(chunk.right);
    }
    assert!(reached >= span);
}

#[test]
fn test_frontier_is_dominance_ordered_after_search() {
    let span = 1 << 16;
    let chunks = generated_chunks(150, span, 0xbeef);
    let index = IntervalIndex::build(chunks);
    let model = CostModel::new(3, 32);

    let searcher = Searcher::new(span, model, &index, SearchOptions::default());
    let solution = searcher.run();
    assert!(solution.best_cost.is_some());

    // At quiescence positions strictly increase and costs never decrease
    // (exact-cost ties at different positions may linger until touched).
    let snapshot = searcher.frontier().snapshot();
    for pair in snapshot.windows(2) {
        assert!(pair[0].0 < pair[1].0);
        assert!(pair[0].1 <= pair[1].1);
    }
}

#[test]
fn test_gap_instance_has_no_solution_in_both_modes() {
    let chunks = vec![Chunk::new(0, 5), Chunk::new(6, 10)];
    let model = CostModel::new(0, 1);
    let index = IntervalIndex::build(chunks);

    for abort_on_gap in [false, true] {
        let searcher = Searcher::new(10, model, &index, SearchOptions { abort_on_gap });
        let solution = searcher.run();
        assert_eq!(solution.best_cost, None);
        assert_eq!(solution.best_sequence, None);
    }
}
