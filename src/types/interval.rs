//! Closed numeric intervals and interval boxes.

use serde::{Deserialize, Serialize};

use super::attribute::{Attribute, ATTRIBUTE_COUNT};

/// Absolute tolerance used for every band, pruning and containment check.
pub const EPS: f64 = 1e-9;

/// Stand-in for an open bound in caller-facing ranges.
pub const OPEN_BOUND: f64 = 1e9;

/// A closed interval `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
}

impl Interval {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// The interval with both bounds open (±[`OPEN_BOUND`]).
    pub const fn unbounded() -> Self {
        Self::new(-OPEN_BOUND, OPEN_BOUND)
    }

    /// Overlap of two closed intervals, `None` when `max(lo) > min(hi)`.
    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        let lo = self.lo.max(other.lo);
        let hi = self.hi.min(other.hi);
        (lo <= hi).then_some(Interval::new(lo, hi))
    }

    /// Containment with the shared [`EPS`] tolerance on both bounds.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lo - EPS && value <= self.hi + EPS
    }

    /// Whether two intervals are the same within [`EPS`].
    pub fn approx_eq(&self, other: &Interval) -> bool {
        (self.lo - other.lo).abs() < EPS && (self.hi - other.hi).abs() < EPS
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lo = if self.lo <= -OPEN_BOUND / 10.0 {
            "-inf".to_string()
        } else {
            format!("{:.2}", self.lo)
        };
        let hi = if self.hi >= OPEN_BOUND / 10.0 {
            "inf".to_string()
        } else {
            format!("{:.2}", self.hi)
        };
        write!(f, "[{lo}, {hi}]")
    }
}

/// One interval per attribute: the target region for a single bounded search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalBox(pub [Interval; ATTRIBUTE_COUNT]);

impl IntervalBox {
    pub fn get(&self, attr: Attribute) -> Interval {
        self.0[attr.index()]
    }

    pub fn lower(&self, k: usize) -> f64 {
        self.0[k].lo
    }

    pub fn upper(&self, k: usize) -> f64 {
        self.0[k].hi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_overlapping_and_disjoint() {
        let a = Interval::new(1.0, 4.0);
        assert_eq!(a.intersect(&Interval::new(3.0, 9.0)), Some(Interval::new(3.0, 4.0)));
        assert_eq!(a.intersect(&Interval::new(4.5, 9.0)), None);
    }

    #[test]
    fn touching_intervals_overlap_in_a_point() {
        let a = Interval::new(1.0, 2.0);
        assert_eq!(a.intersect(&Interval::new(2.0, 3.0)), Some(Interval::new(2.0, 2.0)));
    }

    #[test]
    fn contains_uses_tolerance() {
        let a = Interval::new(1.0, 2.99);
        assert!(a.contains(2.99 + 1e-10));
        assert!(!a.contains(2.995));
        assert!(a.contains(1.0 - 1e-10));
    }

    #[test]
    fn display_marks_open_bounds() {
        assert_eq!(Interval::unbounded().to_string(), "[-inf, inf]");
        assert_eq!(Interval::new(0.0, 11.0).to_string(), "[0.00, 11.00]");
    }
}
