//! Search results: solutions, outcome and structured notes

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::attribute::{Attribute, AttributeVector, PerAttribute};
use super::band::Band;
use super::season::Season;

/// A feasible quantity vector together with everything derived from it.
///
/// Created once when the search confirms feasibility; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Quantity per ingredient, in catalog order
    pub quantities: Vec<u32>,
    /// Sum of all quantities
    pub total_quantity: u32,
    /// Attribute totals rounded to 3 decimals
    pub totals: AttributeVector,
    /// Detected band per attribute (`None` when the value falls in a catalog gap)
    pub bands: PerAttribute<Option<Band>>,
    /// Non-zero quantities keyed by ingredient id
    pub counts_by_id: BTreeMap<String, u32>,
    /// Number of distinct ingredients used
    pub ingredient_count: usize,
    /// Sum of `cost * quantity` at base prices
    pub total_cost: f64,
    /// Total cost under each season's price multipliers
    pub seasonal_costs: BTreeMap<Season, f64>,
    pub min_cost: f64,
    /// Mean of the seasonal costs
    pub average_cost: f64,
    pub max_cost: f64,
}

impl Solution {
    pub fn band(&self, attr: Attribute) -> Option<Band> {
        self.bands[attr]
    }
}

/// Why a search returned fewer (or no) results, or what it adjusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchNote {
    /// Caps were negative
    InvalidCaps { total_cap: i64, per_cap: i64 },
    /// A required minimum is above the per-ingredient cap
    MinimumExceedsPerCap { ingredient: String, minimum: u32, per_cap: u32 },
    /// The total cap was raised to the sum of required minimums
    TotalCapRaised { requested: u32, effective: u32 },
    /// An attribute's compiled interval list was empty
    NoFeasibleIntervals { attribute: Attribute },
    /// No band assignment satisfies the requested color counts
    NoBandAssignment,
    /// The node or time budget ran out; results are partial
    BudgetExhausted { visited_nodes: u64 },
    /// The search was retried with fewer optional ingredients
    TrimmedOptional { kept: usize, total: usize },
}

impl std::fmt::Display for SearchNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCaps { total_cap, per_cap } => {
                write!(f, "caps must be non-negative (total_cap={total_cap}, per_cap={per_cap})")
            }
            Self::MinimumExceedsPerCap { ingredient, minimum, per_cap } => write!(
                f,
                "required minimum {minimum} of '{ingredient}' exceeds per-ingredient cap {per_cap}"
            ),
            Self::TotalCapRaised { requested, effective } => {
                write!(f, "total cap raised from {requested} to {effective} to fit required minimums")
            }
            Self::NoFeasibleIntervals { attribute } => {
                write!(f, "no feasible interval for {attribute}")
            }
            Self::NoBandAssignment => write!(f, "no band assignment satisfies the color counts"),
            Self::BudgetExhausted { visited_nodes } => {
                write!(f, "search budget exhausted after {visited_nodes} nodes, results are partial")
            }
            Self::TrimmedOptional { kept, total } => {
                write!(f, "optional ingredients trimmed to {kept}/{total}")
            }
        }
    }
}

/// Everything one search call produces.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Ranked, deduplicated, truncated solutions
    pub solutions: Vec<Solution>,
    /// Distinct solutions found before truncation
    pub total_solutions: usize,
    /// True when a budget cut the search short
    pub partial: bool,
    /// Total cap actually used (after raising to the minimum sum)
    pub effective_total_cap: u32,
    /// Nodes visited across all boxes
    pub visited_nodes: u64,
    pub notes: Vec<SearchNote>,
}

impl SearchOutcome {
    pub(crate) fn empty(note: SearchNote) -> Self {
        Self {
            notes: vec![note],
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn best(&self) -> Option<&Solution> {
        self.solutions.first()
    }
}
