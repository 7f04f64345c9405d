//! Bounded depth-first search over integer ingredient quantities
//!
//! One [`SearchSpace`] describes the ingredients taking part in a request
//! (per-unit vectors, minimum and maximum quantity, total cap, base). It is
//! searched once per interval box. Every level of the recursion fixes the
//! quantity of one ingredient; suffix envelopes bound what the remaining
//! levels can still contribute, so subtrees that cannot reach the box are cut
//! before they are entered.
//!
//! Pruning and leaf acceptance use the same tolerance ([`EPS`]), so a vector
//! that would pass the leaf check is never pruned on the way down.

use std::collections::HashSet;

use crate::types::{AttributeVector, IntervalBox, ATTRIBUTE_COUNT, EPS};

use super::budget::SearchBudget;

/// A feasible quantity vector as found in one box, in search order.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub quantities: Vec<u32>,
    pub totals: AttributeVector,
}

/// Ingredients, bounds and the precomputed suffix tables for one request.
#[derive(Debug, Clone)]
pub struct SearchSpace {
    vectors: Vec<AttributeVector>,
    minimums: Vec<u32>,
    maximums: Vec<u32>,
    total_cap: u32,
    base: AttributeVector,
    /// `suffix_required[i]`: sum of minimums at positions `i..`
    suffix_required: Vec<u32>,
    /// Smallest reachable contribution of positions `i..`
    suffix_lo: Vec<AttributeVector>,
    /// Largest reachable contribution of positions `i..`
    suffix_hi: Vec<AttributeVector>,
}

impl SearchSpace {
    pub fn new(
        vectors: Vec<AttributeVector>,
        minimums: Vec<u32>,
        maximums: Vec<u32>,
        total_cap: u32,
        base: AttributeVector,
    ) -> Self {
        let n = vectors.len();
        debug_assert_eq!(minimums.len(), n);
        debug_assert_eq!(maximums.len(), n);

        let mut suffix_required = vec![0u32; n + 1];
        let mut suffix_lo = vec![AttributeVector::ZERO; n + 1];
        let mut suffix_hi = vec![AttributeVector::ZERO; n + 1];

        for i in (0..n).rev() {
            suffix_required[i] = suffix_required[i + 1].saturating_add(minimums[i]);
            let lo_q = f64::from(minimums[i]);
            let hi_q = f64::from(maximums[i]);
            for k in 0..ATTRIBUTE_COUNT {
                let coef = vectors[i].0[k];
                // a negative coefficient contributes most at the minimum quantity
                let (lo, hi) = if coef >= 0.0 {
                    (coef * lo_q, coef * hi_q)
                } else {
                    (coef * hi_q, coef * lo_q)
                };
                suffix_lo[i].0[k] = suffix_lo[i + 1].0[k] + lo;
                suffix_hi[i].0[k] = suffix_hi[i + 1].0[k] + hi;
            }
        }

        Self {
            vectors,
            minimums,
            maximums,
            total_cap,
            base,
            suffix_required,
            suffix_lo,
            suffix_hi,
        }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Enumerate every feasible vector whose totals lie in `bounds`.
    ///
    /// Stops early (returning what it has) when `budget` runs out.
    pub fn search_box(&self, bounds: &IntervalBox, budget: &SearchBudget) -> Vec<Hit> {
        let mut walk = BoxWalk {
            space: self,
            bounds,
            budget,
            counts: vec![0; self.len()],
            seen: HashSet::new(),
            hits: Vec::new(),
            aborted: false,
        };
        walk.descend(0, 0, self.base);
        walk.hits
    }

    /// Can the box still be reached from position `idx` with running `totals`?
    fn reachable(&self, idx: usize, totals: &AttributeVector, bounds: &IntervalBox) -> bool {
        (0..ATTRIBUTE_COUNT).all(|k| {
            let best = totals.0[k] + self.suffix_hi[idx].0[k];
            let worst = totals.0[k] + self.suffix_lo[idx].0[k];
            best >= bounds.lower(k) - EPS && worst <= bounds.upper(k) + EPS
        })
    }

    /// Narrow the quantities of position `idx` to those that can keep the box
    /// reachable, starting from `[lo, hi]`.
    ///
    /// Every attribute total is linear in the quantity, so the survivors form a
    /// single run. One unit of slack on each side absorbs rounding;
    /// [`reachable`](Self::reachable) still has the final say per candidate.
    fn candidate_range(
        &self,
        idx: usize,
        totals: &AttributeVector,
        bounds: &IntervalBox,
        lo: u32,
        hi: u32,
    ) -> Option<(u32, u32)> {
        let vector = &self.vectors[idx];
        let mut q_lo = f64::from(lo);
        let mut q_hi = f64::from(hi);

        for k in 0..ATTRIBUTE_COUNT {
            let coef = vector.0[k];
            if coef.abs() <= f64::EPSILON {
                continue;
            }
            // headroom left once the remaining positions contribute their extremes
            let up = bounds.upper(k) + EPS - totals.0[k] - self.suffix_lo[idx + 1].0[k];
            let down = bounds.lower(k) - EPS - totals.0[k] - self.suffix_hi[idx + 1].0[k];
            let (min_q, max_q) = if coef > 0.0 {
                (down / coef, up / coef)
            } else {
                (up / coef, down / coef)
            };
            q_lo = q_lo.max(min_q.ceil() - 1.0);
            q_hi = q_hi.min(max_q.floor() + 1.0);
            if q_hi < q_lo {
                return None;
            }
        }

        // both ends stay inside the original [lo, hi]
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let range = (q_lo as u32, q_hi as u32);
        Some(range)
    }
}

/// Running state of one box search.
struct BoxWalk<'a> {
    space: &'a SearchSpace,
    bounds: &'a IntervalBox,
    budget: &'a SearchBudget,
    counts: Vec<u32>,
    seen: HashSet<Vec<u32>>,
    hits: Vec<Hit>,
    aborted: bool,
}

impl BoxWalk<'_> {
    fn descend(&mut self, idx: usize, used: u32, totals: AttributeVector) {
        if self.aborted {
            return;
        }
        if !self.budget.tick() {
            self.aborted = true;
            return;
        }

        let space = self.space;
        if used + space.suffix_required[idx] > space.total_cap {
            return;
        }
        if !space.reachable(idx, &totals, self.bounds) {
            return;
        }

        if idx == space.len() {
            self.accept(totals);
            return;
        }

        // used + suffix_required[idx] <= total_cap, so this cannot underflow
        let room = space.total_cap - used - space.suffix_required[idx + 1];
        let lo = space.minimums[idx];
        let hi = space.maximums[idx].min(room);
        if hi < lo {
            return;
        }
        let Some((lo, hi)) = space.candidate_range(idx, &totals, self.bounds, lo, hi) else {
            return;
        };

        let vector = space.vectors[idx];
        for q in lo..=hi {
            let next = totals.add_scaled(&vector, f64::from(q));
            if !space.reachable(idx + 1, &next, self.bounds) {
                continue;
            }
            self.counts[idx] = q;
            self.descend(idx + 1, used + q, next);
            if self.aborted {
                break;
            }
        }
        self.counts[idx] = 0;
    }

    fn accept(&mut self, totals: AttributeVector) {
        let inside = (0..ATTRIBUTE_COUNT).all(|k| {
            totals.0[k] >= self.bounds.lower(k) - EPS && totals.0[k] <= self.bounds.upper(k) + EPS
        });
        if !inside || !self.seen.insert(self.counts.clone()) {
            return;
        }
        self.hits.push(Hit {
            quantities: self.counts.clone(),
            totals,
        });
    }
}
