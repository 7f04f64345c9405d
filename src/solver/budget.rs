//! Node-visit and wall-clock budget shared by every box search of one request

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// The deadline is only consulted every this many nodes.
const DEADLINE_CHECK_INTERVAL: u64 = 256;

/// Bounds the worst-case exponential blowup of a search.
///
/// Safe to share across rayon workers; once exhausted it stays exhausted.
#[derive(Debug)]
pub struct SearchBudget {
    max_visits: Option<u64>,
    deadline: Option<Instant>,
    visited: AtomicU64,
    exhausted: AtomicBool,
}

impl SearchBudget {
    /// `max_visits == 0` disables the node budget.
    pub fn new(max_visits: u64, time_budget: Option<Duration>) -> Self {
        Self {
            max_visits: (max_visits > 0).then_some(max_visits),
            deadline: time_budget.map(|d| Instant::now() + d),
            visited: AtomicU64::new(0),
            exhausted: AtomicBool::new(false),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(0, None)
    }

    /// Count one visited node. Returns `false` once the budget is spent.
    pub fn tick(&self) -> bool {
        if self.exhausted.load(Ordering::Relaxed) {
            return false;
        }
        let n = self.visited.fetch_add(1, Ordering::Relaxed) + 1;

        let over_visits = self.max_visits.is_some_and(|max| n > max);
        let over_time = n % DEADLINE_CHECK_INTERVAL == 0
            && self.deadline.is_some_and(|d| Instant::now() >= d);

        if over_visits || over_time {
            self.exhausted.store(true, Ordering::Relaxed);
            return false;
        }
        true
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::Relaxed)
    }

    pub fn visited(&self) -> u64 {
        self.visited.load(Ordering::Relaxed)
    }
}
