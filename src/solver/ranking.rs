//! Ranking and deduplication of pooled solutions

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::types::Solution;

/// Fewer total units first, then the smaller attribute profile, then the smaller vector.
pub fn compare(a: &Solution, b: &Solution) -> Ordering {
    a.total_quantity
        .cmp(&b.total_quantity)
        .then_with(|| {
            a.totals
                .0
                .iter()
                .zip(b.totals.0.iter())
                .map(|(x, y)| x.total_cmp(y))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.quantities.cmp(&b.quantities))
}

/// Sort, drop repeated quantity vectors (first occurrence wins) and keep `top_k`.
///
/// Returns the kept solutions and the number of distinct solutions before truncation.
pub fn rank(mut solutions: Vec<Solution>, top_k: usize) -> (Vec<Solution>, usize) {
    solutions.sort_by(compare);

    let mut seen = HashSet::new();
    solutions.retain(|s| seen.insert(s.quantities.clone()));

    let distinct = solutions.len();
    solutions.truncate(top_k);
    (solutions, distinct)
}
